pub mod choice;
pub mod display;
pub mod scoring;
pub mod state;
