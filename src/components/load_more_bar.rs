use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::{spinner, Component, ACCENT, DIM};
use crate::action::Action;

/// Count line plus the load-more affordance for the incremental view.
pub struct LoadMoreBar;

pub struct LoadMoreBarProps {
    pub shown: usize,
    pub total: u32,
    pub has_next: bool,
    pub fetching: bool,
    pub tick: u64,
    pub is_focused: bool,
    pub on_load_more: fn() -> Action,
}

impl Component<Action> for LoadMoreBar {
    type Props<'a> = LoadMoreBarProps;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || !props.has_next || props.fetching {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Char('m') | KeyCode::Char(' ') => Some((props.on_load_more)()),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let action_line = if props.fetching {
            Line::from(Span::styled(
                format!("{} Loading more Pokémon...", spinner(props.tick)),
                Style::default().fg(ACCENT),
            ))
        } else if props.has_next {
            Line::from(Span::styled(
                "[m] Load More Pokémon",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(
                "All Pokémon loaded.",
                Style::default().fg(DIM),
            ))
        };

        let count_line = Line::from(Span::styled(
            format!("Showing {} of {} Pokémon", props.shown, props.total),
            Style::default().fg(DIM),
        ));

        let bar = Paragraph::new(vec![action_line, count_line]).alignment(Alignment::Center);
        frame.render_widget(bar, area);
    }
}
