use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{display_name, Component, ACCENT, DIM};
use crate::action::Action;
use crate::state::CatalogEntry;

const CARD_WIDTH: u16 = 20;
const CARD_HEIGHT: u16 = 4;

/// Card grid over catalog entries, with skeleton cards while a page loads.
pub struct CatalogGrid {
    /// Columns used by the last render; Up/Down selection jumps one row.
    columns: usize,
}

pub struct CatalogGridProps<'a> {
    pub entries: &'a [CatalogEntry],
    pub selected: usize,
    pub loading: bool,
    /// Skeleton card count while loading.
    pub page_size: u32,
    pub tick: u64,
    pub is_focused: bool,
    pub on_move: fn(i32) -> Action,
    pub on_select: fn(usize) -> Action,
    pub on_open: fn(u32) -> Action,
}

impl Default for CatalogGrid {
    fn default() -> Self {
        Self { columns: 4 }
    }
}

impl CatalogGrid {
    pub fn new() -> Self {
        Self::default()
    }

    fn grid_shape(&self, area: Rect) -> (usize, usize) {
        let columns = (area.width / CARD_WIDTH).max(1) as usize;
        let rows = (area.height / CARD_HEIGHT).max(1) as usize;
        (columns, rows)
    }

    fn card_area(area: Rect, row: usize, col: usize) -> Rect {
        let card = Rect {
            x: area.x + (col as u16) * CARD_WIDTH,
            y: area.y + (row as u16) * CARD_HEIGHT,
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
        };
        card.intersection(area)
    }

    fn render_card(frame: &mut Frame, area: Rect, entry: &CatalogEntry, selected: bool) {
        let border_style = if selected {
            Style::default().fg(ACCENT)
        } else {
            Style::default().fg(DIM)
        };
        let name_style = if selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let lines = vec![
            Line::from(Span::styled(
                format!("◓ {}", display_name(&entry.name)),
                name_style,
            )),
            Line::from(Span::styled(
                format!("#{:03}", entry.id),
                Style::default().fg(DIM),
            )),
        ];
        let card = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).border_style(border_style));
        frame.render_widget(card, area);
    }

    fn render_skeleton_card(frame: &mut Frame, area: Rect, tick: u64) {
        let shade = if (tick / 3) % 2 == 0 { "░░░░░░░░" } else { "▒▒▒▒▒▒▒▒" };
        let lines = vec![
            Line::from(Span::styled(shade, Style::default().fg(DIM))),
            Line::from(Span::styled("░░░░", Style::default().fg(DIM))),
        ];
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(DIM)),
        );
        frame.render_widget(card, area);
    }
}

impl Component<Action> for CatalogGrid {
    type Props<'a> = CatalogGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        let columns = self.columns.max(1) as i32;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some((props.on_move)(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some((props.on_move)(1)),
            KeyCode::Up | KeyCode::Char('k') => Some((props.on_move)(-columns)),
            KeyCode::Down | KeyCode::Char('j') => Some((props.on_move)(columns)),
            KeyCode::Home => Some((props.on_select)(0)),
            KeyCode::End if !props.entries.is_empty() => {
                Some((props.on_select)(props.entries.len() - 1))
            }
            KeyCode::Enter => props
                .entries
                .get(props.selected)
                .map(|entry| (props.on_open)(entry.id)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let (columns, visible_rows) = self.grid_shape(area);
        self.columns = columns;

        if props.loading && props.entries.is_empty() {
            let cards = (props.page_size as usize).min(columns * visible_rows);
            for index in 0..cards {
                let card_area = Self::card_area(area, index / columns, index % columns);
                Self::render_skeleton_card(frame, card_area, props.tick);
            }
            return;
        }

        if props.entries.is_empty() {
            // Out-of-range pages are requested as-is and come back empty.
            let empty = Paragraph::new("No Pokémon on this page.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(DIM));
            frame.render_widget(empty, area);
            return;
        }

        let selected_row = props.selected / columns;
        let first_row = selected_row.saturating_sub(visible_rows.saturating_sub(1));

        for row in 0..visible_rows {
            for col in 0..columns {
                let index = (first_row + row) * columns + col;
                let Some(entry) = props.entries.get(index) else {
                    continue;
                };
                let card_area = Self::card_area(area, row, col);
                Self::render_card(frame, card_area, entry, index == props.selected);
            }
        }
    }
}
