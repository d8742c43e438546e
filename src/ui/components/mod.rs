pub mod confirm_dialog;
pub mod progress_bar;
pub mod score_summary;
pub mod sheet_grid;
