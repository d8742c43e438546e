use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::exam::{Section, TOTAL_QUESTIONS};
use crate::sheet::scoring::{self, Tally};
use crate::sheet::state::SheetState;
use crate::ui::theme::Theme;

pub struct ScoreSummary<'a> {
    sheet: &'a SheetState,
    theme: &'a Theme,
}

impl<'a> ScoreSummary<'a> {
    pub fn new(sheet: &'a SheetState, theme: &'a Theme) -> Self {
        Self { sheet, theme }
    }

    fn tally_line(&self, label: &str, tally: Tally, total: usize) -> Line<'static> {
        let colors = &self.theme.colors;
        let score = format!(
            "{}/{} ({:.1}%)",
            tally.correct,
            total,
            scoring::percent(tally.correct, total)
        );
        Line::from(vec![
            Span::styled(format!("  {label:<44}"), Style::default().fg(colors.fg())),
            Span::styled(
                format!("{score:>16}"),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "   \u{2713} {:<4} \u{2717} {:<4} \u{2014} {:<4} ? {}",
                    tally.correct, tally.incorrect, tally.unanswered, tally.ungraded
                ),
                Style::default().fg(colors.text_dim()),
            ),
        ])
    }
}

impl Widget for ScoreSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let answers = &self.sheet.answers;
        let key = &self.sheet.key;

        let block = Block::bordered()
            .title(" Score Summary ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(""));

        if key.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No answer key set yet. Press [m] on the sheet to mark one.",
                Style::default().fg(colors.warning()),
            )));
            lines.push(Line::from(""));
        }

        let global = scoring::tally_all(answers, key);
        lines.push(self.tally_line("Total", global, TOTAL_QUESTIONS as usize));
        lines.push(Line::from(""));

        for section in Section::ALL {
            let tally = scoring::tally_section(answers, key, section);
            lines.push(Line::from(Span::styled(
                format!("  {}", section.title()),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(self.tally_line("Section", tally, section.len() as usize));
            for part in section.parts() {
                let tally = scoring::tally_part(answers, key, part);
                let label = format!(
                    "Part {}  {}  Q{}-{}",
                    part.number, part.name, part.start, part.end
                );
                lines.push(self.tally_line(&label, tally, part.len() as usize));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            "  [Esc] Back to sheet",
            Style::default().fg(colors.accent()),
        )));

        let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
        paragraph.render(inner, buf);
    }
}
