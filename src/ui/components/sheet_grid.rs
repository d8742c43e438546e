use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::exam::{self, Section};
use crate::sheet::choice::Choice;
use crate::sheet::display::{BubbleDisplay, RowMarker, bubble_display, row_marker};
use crate::sheet::scoring::answered_in;
use crate::sheet::state::SheetState;
use crate::ui::theme::Theme;

// One row: "123 ✓ (A) (B) (C) (D)" — number, marker, four bubbles.
const ROW_WIDTH: u16 = 3 + 2 + 4 * 4;
const COLUMN_GAP: u16 = 2;

pub struct SheetGrid<'a> {
    section: Section,
    sheet: &'a SheetState,
    cursor: u16,
    questions_per_column: u16,
    theme: &'a Theme,
}

impl<'a> SheetGrid<'a> {
    pub fn new(
        section: Section,
        sheet: &'a SheetState,
        cursor: u16,
        questions_per_column: u16,
        theme: &'a Theme,
    ) -> Self {
        Self {
            section,
            sheet,
            cursor,
            questions_per_column,
            theme,
        }
    }

    fn bubble_style(&self, display: BubbleDisplay) -> Style {
        let colors = &self.theme.colors;
        match display {
            BubbleDisplay::KeySelected => Style::default()
                .fg(colors.bg())
                .bg(colors.key_selected())
                .add_modifier(Modifier::BOLD),
            BubbleDisplay::KeyUnselected => Style::default().fg(colors.text_dim()),
            BubbleDisplay::CorrectChosen => Style::default()
                .fg(colors.bg())
                .bg(colors.bubble_correct())
                .add_modifier(Modifier::BOLD),
            BubbleDisplay::IncorrectChosen => Style::default()
                .fg(colors.bg())
                .bg(colors.bubble_incorrect())
                .add_modifier(Modifier::BOLD),
            BubbleDisplay::CorrectHint => Style::default().fg(colors.bubble_hint()),
            BubbleDisplay::PlainChosen => Style::default()
                .fg(colors.bg())
                .bg(colors.bubble_marked())
                .add_modifier(Modifier::BOLD),
            BubbleDisplay::PlainUnchosen => Style::default().fg(colors.text_dim()),
        }
    }

    fn marker_style(&self, marker: RowMarker) -> Style {
        let colors = &self.theme.colors;
        match marker {
            RowMarker::Correct => Style::default().fg(colors.bubble_correct()),
            RowMarker::Incorrect => Style::default().fg(colors.bubble_incorrect()),
            RowMarker::Unanswered => Style::default().fg(colors.text_dim()),
        }
    }
}

/// Where a question lands on the grid: questions fill columns top to bottom,
/// left to right, `per_column` rows each.
pub fn grid_position(question: u16, start: u16, per_column: u16) -> (u16, u16) {
    let offset = question - start;
    (offset / per_column, offset % per_column)
}

impl Widget for SheetGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (start, end) = self.section.bounds();
        let cursor_here = (start..=end).contains(&self.cursor);

        let answered = answered_in(self.sheet.active(), start, end);
        let mode_tag = if self.sheet.key_mode { "ANSWER KEY" } else { "ANSWERED" };
        let title = format!(
            " {}  Q{start}-{end}  {mode_tag} {answered}/{} ",
            self.section.title(),
            self.section.len(),
        );

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if cursor_here {
                colors.accent()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < ROW_WIDTH || inner.height == 0 {
            return;
        }

        let per_column = self.questions_per_column.min(inner.height).max(1);
        let stride = ROW_WIDTH + COLUMN_GAP;

        for q in start..=end {
            let (col, row) = grid_position(q, start, per_column);
            let x = inner.x + col * stride;
            let y = inner.y + row;
            if x + ROW_WIDTH > inner.x + inner.width {
                // Terminal too small for the full section; the cursor section
                // border still tells the user where they are.
                break;
            }

            let answer = self.sheet.answers.get(&q).copied();
            let key = self.sheet.key.get(&q).copied();

            let number_style = if q == self.cursor {
                Style::default()
                    .fg(colors.cursor_fg())
                    .bg(colors.cursor_bg())
                    .add_modifier(Modifier::BOLD)
            } else if exam::is_part_start(q) {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            buf.set_string(x, y, format!("{q:>3}"), number_style);

            if let Some(marker) = row_marker(self.sheet.key_mode, answer, key) {
                buf.set_string(x + 4, y, marker.glyph(), self.marker_style(marker));
            }

            for (i, option) in Choice::ALL.into_iter().enumerate() {
                let display = bubble_display(self.sheet.key_mode, answer, key, option);
                let bubble = format!("({})", option.as_char());
                let bx = x + 5 + (i as u16) * 4 + 1;
                buf.set_string(bx, y, &bubble, self.bubble_style(display));
            }
        }
    }
}
