use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::{Component, DIM, FAILURE};
use crate::action::Action;

/// Fallback drawn over a region whose boundary captured a failure.
pub struct RecoveryPanel;

pub struct RecoveryPanelProps<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

impl Component<Action> for RecoveryPanel {
    type Props<'a> = RecoveryPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        frame.render_widget(Clear, area);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                props.title,
                Style::default().fg(FAILURE).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(props.message, Style::default().fg(FAILURE))),
            Line::from(""),
            Line::from(Span::styled(
                "[r] try again   [backspace] go back",
                Style::default().fg(DIM),
            )),
        ];

        let panel = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(FAILURE)),
        );
        frame.render_widget(panel, area);
    }
}
