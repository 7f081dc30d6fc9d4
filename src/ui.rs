//! Screen composition and event routing.
//!
//! `Ui` owns the widget state plus one failure boundary per failable region
//! (browse list, detail). Boundaries are replaced wholesale when the
//! top-level scope changes, so a capture never leaks across a mode switch.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::{DataResource, EventKind, EventOutcome, RenderContext};
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::boundary::{Boundary, RenderFailure};
use crate::components::{
    CatalogGrid, CatalogGridProps, Component, DetailPanel, DetailPanelProps, GotoOverlay,
    GotoOverlayProps, LoadMoreBar, LoadMoreBarProps, NavHeader, NavHeaderProps, PaginationBar,
    PaginationBarProps, RecoveryPanel, RecoveryPanelProps,
};
use crate::state::{AppState, DetailTarget, ViewMode};

const LIST_FAILURE_TITLE: &str = "Failed to load Pokémon";
const DETAIL_FAILURE_TITLE: &str = "Failed to load Pokémon details";

/// Which top-level region owns the boundaries. A change discards any capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoundaryScope {
    Browse(ViewMode),
    Detail,
}

pub struct Ui {
    header: NavHeader,
    grid: CatalogGrid,
    pagination: PaginationBar,
    load_more: LoadMoreBar,
    detail_panel: DetailPanel,
    goto: GotoOverlay,
    recovery: RecoveryPanel,
    status_bar: StatusBar,
    list_boundary: Boundary,
    detail_boundary: Boundary,
    scope: BoundaryScope,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            header: NavHeader,
            grid: CatalogGrid::new(),
            pagination: PaginationBar,
            load_more: LoadMoreBar,
            detail_panel: DetailPanel,
            goto: GotoOverlay::new(),
            recovery: RecoveryPanel,
            status_bar: StatusBar::new(),
            list_boundary: Boundary::new(),
            detail_boundary: Boundary::new(),
            scope: BoundaryScope::Browse(ViewMode::Paginated),
        }
    }
}

impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync_scope(&mut self, state: &AppState) {
        let scope = if state.is_detail() {
            BoundaryScope::Detail
        } else {
            BoundaryScope::Browse(state.mode)
        };
        if scope != self.scope {
            self.scope = scope;
            self.list_boundary = Boundary::new();
            self.detail_boundary = Boundary::new();
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, _ctx: RenderContext) {
        self.sync_scope(state);

        let layout = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

        self.header.render(
            frame,
            layout[0],
            NavHeaderProps {
                mode: state.mode,
                location: state.history.current(),
                is_detail: state.is_detail(),
            },
        );

        if state.is_detail() {
            self.render_detail(frame, layout[1], state);
        } else {
            self.render_browse(frame, layout[1], state);
        }

        self.render_footer(frame, layout[2], state);

        self.goto.set_open(state.goto.active);
        if state.goto.active {
            self.goto.render(
                frame,
                layout[1],
                GotoOverlayProps {
                    input: &state.goto.input,
                    error: state.goto.error.as_deref(),
                    is_focused: true,
                    on_change: Action::GotoChange,
                    on_submit: Action::GotoSubmit,
                },
            );
        }
    }

    fn render_browse(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Grid
            Constraint::Length(2), // Pagination / load-more bar
        ])
        .split(area);

        let grid = &mut self.grid;
        let pagination = &mut self.pagination;
        let load_more = &mut self.load_more;
        let grid_focused = !state.goto.active;

        let failure = self.list_boundary.guard(|| {
            let failed = match state.mode {
                ViewMode::Paginated => state.page_data.error(),
                ViewMode::Incremental => state.feed_fetch.error(),
            };
            if let Some(message) = failed {
                return Err(RenderFailure::new(message));
            }

            grid.render(
                frame,
                chunks[0],
                CatalogGridProps {
                    entries: state.visible_entries(),
                    selected: state.selected_index,
                    loading: state.browse_loading(),
                    page_size: state.page_size,
                    tick: state.tick,
                    is_focused: grid_focused,
                    on_move: Action::SelectionMove,
                    on_select: Action::SelectionSet,
                    on_open: Action::NavigateDetail,
                },
            );

            match state.mode {
                ViewMode::Paginated => {
                    let total = state.total_pages().unwrap_or(0);
                    pagination.render(
                        frame,
                        chunks[1],
                        PaginationBarProps {
                            current: state.page,
                            total,
                            is_focused: grid_focused,
                            on_page: Action::NavigatePage,
                        },
                    );
                }
                ViewMode::Incremental => {
                    load_more.render(
                        frame,
                        chunks[1],
                        LoadMoreBarProps {
                            shown: state.feed.items().len(),
                            total: state.feed.total_count(),
                            has_next: state.feed.has_next(),
                            fetching: state.feed_fetch.is_loading(),
                            tick: state.tick,
                            is_focused: grid_focused,
                            on_load_more: || Action::FeedLoadNext,
                        },
                    );
                }
            }
            Ok(())
        });

        if let Some(failure) = failure {
            let message = failure.message().to_string();
            self.recovery.render(
                frame,
                area,
                RecoveryPanelProps {
                    title: LIST_FAILURE_TITLE,
                    message: &message,
                },
            );
        }
    }

    fn render_detail(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if let Some(DetailTarget::Invalid(raw)) = &state.detail_target {
            // Malformed ids never reach a boundary; they get a dedicated
            // message and no retry.
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Invalid Pokémon ID",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("'{raw}' is not a valid number. [backspace] go back")),
            ];
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
            return;
        }

        let detail_panel = &mut self.detail_panel;
        let failure = self.detail_boundary.guard(|| {
            match &state.detail_data {
                DataResource::Failed(message) => Err(RenderFailure::new(message.clone())),
                DataResource::Loaded(detail) => {
                    detail_panel.render(frame, area, DetailPanelProps { detail });
                    Ok(())
                }
                DataResource::Loading | DataResource::Empty => {
                    let placeholder = Paragraph::new(format!(
                        "{} Loading Pokémon...",
                        crate::components::spinner(state.tick)
                    ))
                    .alignment(Alignment::Center);
                    frame.render_widget(placeholder, area);
                    Ok(())
                }
            }
        });

        if let Some(failure) = failure {
            let message = failure.message().to_string();
            self.recovery.render(
                frame,
                area,
                RecoveryPanelProps {
                    title: DETAIL_FAILURE_TITLE,
                    message: &message,
                },
            );
        }
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let status = state.message.clone().unwrap_or_else(|| {
            if state.page_data.is_loading() || state.feed_fetch.is_loading() {
                "Loading Pokémon...".to_string()
            } else if state.detail_data.is_loading() {
                "Loading details...".to_string()
            } else {
                String::new()
            }
        });

        let hints = status_hints(state);
        let status_span = Span::styled(status, Style::default());
        let status_items = [StatusBarItem::span(status_span)];
        let props = StatusBarProps {
            left: StatusBarSection::hints(&hints).with_separator("  "),
            center: StatusBarSection::empty(),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style: StatusBarStyle::default(),
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, props);
    }

    pub fn handle_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        if let EventKind::Resize(width, height) = event {
            return EventOutcome::action(Action::UiTerminalResize(*width, *height)).with_render();
        }

        if state.goto.active {
            return EventOutcome::from_actions(self.goto.handle_event(
                event,
                GotoOverlayProps {
                    input: &state.goto.input,
                    error: state.goto.error.as_deref(),
                    is_focused: true,
                    on_change: Action::GotoChange,
                    on_submit: Action::GotoSubmit,
                },
            ));
        }

        let EventKind::Key(key) = event else {
            return EventOutcome::ignored();
        };

        // Global keys first.
        match key.code {
            KeyCode::Char('q') => return EventOutcome::action(Action::Quit),
            KeyCode::Char('[') => return EventOutcome::action(Action::NavigateBack),
            KeyCode::Char(']') => return EventOutcome::action(Action::NavigateForward),
            KeyCode::Char('r') => return self.retry_outcome(),
            _ => {}
        }

        if state.is_detail() {
            return match key.code {
                KeyCode::Backspace | KeyCode::Esc => EventOutcome::action(Action::NavigateBack),
                _ => EventOutcome::ignored(),
            };
        }

        match key.code {
            KeyCode::Tab => return EventOutcome::action(Action::NavigateMode(state.mode.toggle())),
            KeyCode::Char('g') => return EventOutcome::action(Action::GotoOpen),
            _ => {}
        }

        if self.list_boundary.is_tripped() {
            // Recovery panel owns the region; only the global keys above apply.
            return EventOutcome::ignored();
        }

        let grid_actions: Vec<Action> = self
            .grid
            .handle_event(
                event,
                CatalogGridProps {
                    entries: state.visible_entries(),
                    selected: state.selected_index,
                    loading: state.browse_loading(),
                    page_size: state.page_size,
                    tick: state.tick,
                    is_focused: true,
                    on_move: Action::SelectionMove,
                    on_select: Action::SelectionSet,
                    on_open: Action::NavigateDetail,
                },
            )
            .into_iter()
            .collect();
        if !grid_actions.is_empty() {
            return EventOutcome::from_actions(grid_actions);
        }

        match state.mode {
            ViewMode::Paginated => EventOutcome::from_actions(self.pagination.handle_event(
                event,
                PaginationBarProps {
                    current: state.page,
                    total: state.total_pages().unwrap_or(0),
                    is_focused: true,
                    on_page: Action::NavigatePage,
                },
            )),
            ViewMode::Incremental => EventOutcome::from_actions(self.load_more.handle_event(
                event,
                LoadMoreBarProps {
                    shown: state.feed.items().len(),
                    total: state.feed.total_count(),
                    has_next: state.feed.has_next(),
                    fetching: state.feed_fetch.is_loading(),
                    tick: state.tick,
                    is_focused: true,
                    on_load_more: || Action::FeedLoadNext,
                },
            )),
        }
    }

    /// Reset whichever boundary is tripped, then re-issue the fetch. With no
    /// capture this is a plain refresh of the current region.
    fn retry_outcome(&mut self) -> EventOutcome<Action> {
        self.list_boundary.reset();
        self.detail_boundary.reset();
        EventOutcome::action(Action::Retry)
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint> {
    if state.is_detail() {
        vec![
            StatusBarHint::new("r", "retry"),
            StatusBarHint::new("backspace", "back"),
            StatusBarHint::new("q", "quit"),
        ]
    } else {
        let more = match state.mode {
            ViewMode::Paginated => StatusBarHint::new("n/p", "page"),
            ViewMode::Incremental => StatusBarHint::new("m", "load more"),
        };
        vec![
            StatusBarHint::new("enter", "open"),
            more,
            StatusBarHint::new("tab", "mode"),
            StatusBarHint::new("g", "goto id"),
            StatusBarHint::new("[ ]", "history"),
            StatusBarHint::new("q", "quit"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn key_event(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_tab_toggles_the_browse_mode() {
        let mut ui = Ui::new();
        let state = AppState::default();

        let outcome = ui.handle_event(&key_event(KeyCode::Tab), &state);
        assert_eq!(
            outcome.actions,
            vec![Action::NavigateMode(ViewMode::Incremental)]
        );
    }

    #[test]
    fn test_retry_key_resets_a_tripped_boundary() {
        let mut ui = Ui::new();
        let state = AppState::default();
        ui.list_boundary
            .guard(|| Err(RenderFailure::new("Failed to fetch data: status 500")));
        assert!(ui.list_boundary.is_tripped());

        let outcome = ui.handle_event(&key_event(KeyCode::Char('r')), &state);

        assert_eq!(outcome.actions, vec![Action::Retry]);
        assert!(!ui.list_boundary.is_tripped());
    }

    #[test]
    fn test_mode_switch_discards_boundary_captures() {
        let mut ui = Ui::new();
        ui.list_boundary
            .guard(|| Err(RenderFailure::new("boom")));
        assert!(ui.list_boundary.is_tripped());

        let mut state = AppState::default();
        state.mode = ViewMode::Incremental;
        ui.sync_scope(&state);

        assert!(!ui.list_boundary.is_tripped());
    }

    #[test]
    fn test_detail_screen_backspace_navigates_back() {
        let mut ui = Ui::new();
        let mut state = AppState::default();
        state.detail_target = Some(DetailTarget::Id(25));

        let outcome = ui.handle_event(&key_event(KeyCode::Backspace), &state);
        assert_eq!(outcome.actions, vec![Action::NavigateBack]);
    }

    #[test]
    fn test_goto_overlay_consumes_keys_while_open() {
        let mut ui = Ui::new();
        let mut state = AppState::default();
        state.goto.active = true;

        let outcome = ui.handle_event(&key_event(KeyCode::Esc), &state);
        assert_eq!(outcome.actions, vec![Action::GotoClose]);
    }

    #[test]
    fn test_render_browse_shows_the_empty_page_message() {
        let mut render = RenderHarness::new(100, 30);
        let mut ui = Ui::new();
        let state = AppState::default();

        let output = render.render_to_string_plain(|frame| {
            ui.render_browse(frame, frame.area(), &state);
        });
        assert!(output.contains("No Pokémon on this page."));
    }

    #[test]
    fn test_render_detail_rejects_invalid_ids_without_a_boundary() {
        let mut render = RenderHarness::new(100, 30);
        let mut ui = Ui::new();
        let mut state = AppState::default();
        state.detail_target = Some(DetailTarget::Invalid("abc".into()));

        let output = render.render_to_string_plain(|frame| {
            ui.render_detail(frame, frame.area(), &state);
        });
        assert!(output.contains("Invalid Pokémon ID"));
        assert!(!ui.detail_boundary.is_tripped());
    }

    #[test]
    fn test_render_detail_failure_trips_the_boundary_and_shows_recovery() {
        let mut render = RenderHarness::new(100, 30);
        let mut ui = Ui::new();
        let mut state = AppState::default();
        state.detail_target = Some(DetailTarget::Id(9999));
        state.detail_data = DataResource::Failed("Failed to fetch data: status 404".into());

        let output = render.render_to_string_plain(|frame| {
            ui.render_detail(frame, frame.area(), &state);
        });
        assert!(ui.detail_boundary.is_tripped());
        assert!(output.contains("Failed to load Pokémon details"));
        assert!(output.contains("status 404"));
    }
}
