use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::{Component, ACCENT, DIM};
use crate::action::Action;

/// How many neighbours to show on each side of the current page.
const DELTA: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    Gap,
}

/// Windowed page numbers: endpoints always visible, a `DELTA`-wide band around
/// the current page, ellipsis gaps between.
pub fn visible_pages(current: u32, total: u32) -> Vec<PageSlot> {
    if total <= 1 {
        return vec![PageSlot::Page(1)];
    }

    let mut slots = Vec::new();
    if current > DELTA + 2 {
        slots.push(PageSlot::Page(1));
        slots.push(PageSlot::Gap);
    } else {
        slots.push(PageSlot::Page(1));
    }

    let band_start = current.saturating_sub(DELTA).max(2);
    let band_end = current.saturating_add(DELTA).min(total - 1);
    for page in band_start..=band_end {
        slots.push(PageSlot::Page(page));
    }

    if current + DELTA < total - 1 {
        slots.push(PageSlot::Gap);
        slots.push(PageSlot::Page(total));
    } else {
        slots.push(PageSlot::Page(total));
    }

    slots
}

/// Previous / numbered window / next controls for the paginated view.
pub struct PaginationBar;

pub struct PaginationBarProps {
    /// 1-based current page.
    pub current: u32,
    pub total: u32,
    pub is_focused: bool,
    pub on_page: fn(u32) -> Action,
}

impl Component<Action> for PaginationBar {
    type Props<'a> = PaginationBarProps;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.total <= 1 {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Char('n') | KeyCode::PageDown if props.current < props.total => {
                Some((props.on_page)(props.current + 1))
            }
            KeyCode::Char('p') | KeyCode::PageUp if props.current > 1 => {
                Some((props.on_page)(props.current - 1))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if props.total <= 1 {
            return;
        }

        let mut spans = Vec::new();
        let prev_style = if props.current > 1 {
            Style::default()
        } else {
            Style::default().fg(DIM)
        };
        spans.push(Span::styled("[p] Prev ", prev_style));

        for slot in visible_pages(props.current, props.total) {
            match slot {
                PageSlot::Page(page) if page == props.current => {
                    spans.push(Span::styled(
                        format!(" {page} "),
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    ));
                }
                PageSlot::Page(page) => {
                    spans.push(Span::raw(format!(" {page} ")));
                }
                PageSlot::Gap => {
                    spans.push(Span::styled(" … ", Style::default().fg(DIM)));
                }
            }
        }

        let next_style = if props.current < props.total {
            Style::default()
        } else {
            Style::default().fg(DIM)
        };
        spans.push(Span::styled(" [n] Next", next_style));

        let bar = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(bar, area);
    }
}
