//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::route::{Route, ViewState};
use crate::state::{AppState, DetailTarget, GotoState, LoadMoreFeed, ViewMode};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => apply_location(state),

        // ===== Navigation =====
        Action::NavigateMode(mode) => {
            if !state.is_detail() && state.mode == mode {
                return DispatchResult::unchanged();
            }
            let view = match mode {
                ViewMode::Paginated => ViewState::paginated(1),
                ViewMode::Incremental => ViewState::incremental(),
            };
            push_and_apply(state, Route::Browse(view))
        }

        Action::NavigatePage(page) => {
            let page = page.max(1);
            if !state.is_detail() && state.mode == ViewMode::Paginated && state.page == page {
                return DispatchResult::unchanged();
            }
            push_and_apply(state, Route::Browse(ViewState::paginated(page)))
        }

        Action::NavigateDetail(id) => push_and_apply(state, Route::Detail(id.to_string())),

        Action::NavigateBack => {
            if !state.history.back() {
                return DispatchResult::unchanged();
            }
            apply_location(state)
        }

        Action::NavigateForward => {
            if !state.history.forward() {
                return DispatchResult::unchanged();
            }
            apply_location(state)
        }

        // ===== Grid selection =====
        Action::SelectionMove(delta) => {
            if state.is_detail() || state.goto.active {
                return DispatchResult::unchanged();
            }
            if state.move_selection(delta) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SelectionSet(index) => {
            if state.is_detail() || state.goto.active {
                return DispatchResult::unchanged();
            }
            if state.set_selected_index(index) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Paginated list results =====
        Action::PageDidLoad { offset, page } => {
            if !page_fetch_is_current(state, offset) {
                // resolved after the user moved on; not applied
                return DispatchResult::unchanged();
            }
            state.page_data = DataResource::Loaded(page);
            let last = state.visible_entries().len().saturating_sub(1);
            state.selected_index = state.selected_index.min(last);
            DispatchResult::changed()
        }

        Action::PageDidError { offset, error } => {
            if !page_fetch_is_current(state, offset) {
                return DispatchResult::unchanged();
            }
            state.page_data = DataResource::Failed(error);
            DispatchResult::changed()
        }

        // ===== Load-more feed =====
        Action::FeedLoadNext => {
            if state.is_detail() || state.mode != ViewMode::Incremental {
                return DispatchResult::unchanged();
            }
            if state.feed_fetch.is_loading() {
                return DispatchResult::unchanged();
            }
            if !state.feed.has_next() {
                state.message = Some("Nothing more to load.".to_string());
                return DispatchResult::changed();
            }
            state.message = None;
            state.feed_fetch = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadFeedPage {
                limit: state.page_size,
                offset: state.feed.next_offset(state.page_size),
            })
        }

        Action::FeedDidLoad { offset, page } => {
            if !feed_fetch_is_current(state, offset) {
                return DispatchResult::unchanged();
            }
            state.feed.push_page(page);
            state.feed_fetch = DataResource::Loaded(offset);
            DispatchResult::changed()
        }

        Action::FeedDidError { offset, error } => {
            if !feed_fetch_is_current(state, offset) {
                return DispatchResult::unchanged();
            }
            state.feed_fetch = DataResource::Failed(error);
            DispatchResult::changed()
        }

        // ===== Detail results =====
        Action::DetailDidLoad(detail) => {
            if state.detail_target != Some(DetailTarget::Id(detail.id)) {
                return DispatchResult::unchanged();
            }
            state.detail_data = DataResource::Loaded(detail);
            DispatchResult::changed()
        }

        Action::DetailDidError { id, error } => {
            if state.detail_target != Some(DetailTarget::Id(id)) {
                return DispatchResult::unchanged();
            }
            state.detail_data = DataResource::Failed(error);
            DispatchResult::changed()
        }

        // ===== Jump-to-id overlay =====
        Action::GotoOpen => {
            state.goto = GotoState {
                active: true,
                ..GotoState::default()
            };
            DispatchResult::changed()
        }

        Action::GotoClose => {
            state.goto = GotoState::default();
            DispatchResult::changed()
        }

        Action::GotoChange(input) => {
            state.goto.input = input;
            state.goto.error = None;
            DispatchResult::changed()
        }

        Action::GotoSubmit(input) => {
            let raw = input.trim().to_string();
            state.goto.input = raw.clone();
            match raw.parse::<u32>() {
                Ok(id) => {
                    state.goto = GotoState::default();
                    push_and_apply(state, Route::Detail(id.to_string()))
                }
                // Malformed id: no fetch is ever issued
                Err(_) => {
                    state.goto.error = Some(format!("'{raw}' is not a valid Pokémon id"));
                    DispatchResult::changed()
                }
            }
        }

        Action::Retry => retry_current(state),

        Action::Render => DispatchResult::changed(),

        Action::UiTerminalResize(width, height) => {
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => {
            if state.any_loading() {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn page_fetch_is_current(state: &AppState, offset: u32) -> bool {
    !state.is_detail()
        && state.mode == ViewMode::Paginated
        && offset == state.offset_for_page(state.page)
}

fn feed_fetch_is_current(state: &AppState, offset: u32) -> bool {
    !state.is_detail()
        && state.mode == ViewMode::Incremental
        && state.feed_fetch.is_loading()
        && offset == state.feed.next_offset(state.page_size)
}

fn push_and_apply(state: &mut AppState, route: Route) -> DispatchResult<Effect> {
    state.history.push(route.to_location());
    apply_location(state)
}

/// Rebuild view state from the current history entry. The location string is
/// the single source of truth: this re-parses it rather than trusting any
/// in-memory copy, so pushes and back/forward all take the same path.
fn apply_location(state: &mut AppState) -> DispatchResult<Effect> {
    state.message = None;
    state.goto = GotoState::default();
    match Route::parse(state.history.current()) {
        Route::Browse(view) => {
            state.detail_target = None;
            state.detail_data = DataResource::Empty;
            state.mode = view.mode;
            state.page = view.page;
            state.selected_index = 0;
            match view.mode {
                ViewMode::Paginated => {
                    state.feed = LoadMoreFeed::default();
                    state.feed_fetch = DataResource::Empty;
                    state.page_data = DataResource::Loading;
                    DispatchResult::changed_with(Effect::LoadPage {
                        limit: state.page_size,
                        offset: state.offset_for_page(view.page),
                    })
                }
                ViewMode::Incremental => {
                    // Feed position is not carried by the location; accumulation
                    // always restarts at offset 0.
                    state.page_data = DataResource::Empty;
                    state.feed = LoadMoreFeed::default();
                    state.feed_fetch = DataResource::Loading;
                    DispatchResult::changed_with(Effect::LoadFeedPage {
                        limit: state.page_size,
                        offset: 0,
                    })
                }
            }
        }
        Route::Detail(raw) => match raw.parse::<u32>() {
            Ok(id) => {
                state.detail_target = Some(DetailTarget::Id(id));
                state.detail_data = DataResource::Loading;
                DispatchResult::changed_with(Effect::LoadDetail { id })
            }
            Err(_) => {
                state.detail_target = Some(DetailTarget::Invalid(raw));
                state.detail_data = DataResource::Empty;
                DispatchResult::changed()
            }
        },
    }
}

/// Re-issue exactly one fetch for the region the user is looking at.
fn retry_current(state: &mut AppState) -> DispatchResult<Effect> {
    match &state.detail_target {
        Some(DetailTarget::Id(id)) => {
            let id = *id;
            state.detail_data = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadDetail { id })
        }
        Some(DetailTarget::Invalid(_)) => DispatchResult::unchanged(),
        None => match state.mode {
            ViewMode::Paginated => {
                state.page_data = DataResource::Loading;
                DispatchResult::changed_with(Effect::LoadPage {
                    limit: state.page_size,
                    offset: state.offset_for_page(state.page),
                })
            }
            ViewMode::Incremental => {
                state.message = None;
                state.feed_fetch = DataResource::Loading;
                DispatchResult::changed_with(Effect::LoadFeedPage {
                    limit: state.page_size,
                    offset: state.feed.next_offset(state.page_size),
                })
            }
        },
    }
}
