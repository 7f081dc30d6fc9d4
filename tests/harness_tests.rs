//! Tests using the EffectStoreTestHarness
//!
//! These tests exercise the full dispatch flow: intent action -> effect ->
//! simulated async completion -> state, across both browse modes and the
//! detail screen.

use pokedex::{
    action::Action,
    effect::Effect,
    reducer::reducer,
    state::{AppState, CatalogEntry, CatalogPage, PokemonAbility, PokemonDetail, PokemonStat, ViewMode},
};
use tui_dispatch::testing::*;

/// Helper to create a catalog page
fn page_of(ids: std::ops::Range<u32>, total: u32, has_next: bool) -> CatalogPage {
    CatalogPage {
        items: ids
            .map(|id| CatalogEntry {
                id,
                name: format!("mon-{id}"),
                summary_url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
            })
            .collect(),
        total_count: total,
        has_next,
    }
}

fn pikachu() -> PokemonDetail {
    PokemonDetail {
        id: 25,
        name: "pikachu".into(),
        types: vec!["electric".into()],
        stats: vec![PokemonStat {
            name: "speed".into(),
            value: 90,
        }],
        abilities: vec![PokemonAbility {
            name: "static".into(),
            is_hidden: false,
        }],
        height: 4,
        weight: 60,
        base_experience: Some(112),
        artwork_url: None,
    }
}

// ============================================================================
// Paginated flow
// ============================================================================

#[test]
fn test_paginated_fetch_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.page_data.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadPage {
                limit: 20,
                offset: 0
            }
        )
    });

    harness.complete_action(Action::PageDidLoad {
        offset: 0,
        page: page_of(1..21, 1302, true),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 1);

    harness.assert_state(|s| s.page_data.is_loaded());
    harness.assert_state(|s| s.visible_entries().len() == 20);
}

#[test]
fn test_page_three_requests_offset_forty() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.dispatch_collect(Action::NavigatePage(3));

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadPage {
                limit: 20,
                offset: 40
            }
        )
    });

    // A catalog of 1302 entries at 20 per page paginates into 66 pages.
    harness.complete_action(Action::PageDidLoad {
        offset: 40,
        page: page_of(41..61, 1302, true),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.total_pages() == Some(66));
}

#[test]
fn test_page_error_flow_and_retry() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.complete_action(Action::PageDidError {
        offset: 0,
        error: "Failed to fetch data: status 500".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.page_data.is_failed());

    // Retry re-issues exactly one fetch for the same page.
    harness.dispatch_collect(Action::Retry);
    harness.assert_state(|s| s.page_data.is_loading());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_all_match(|e| {
        matches!(
            e,
            Effect::LoadPage {
                limit: 20,
                offset: 0
            }
        )
    });
}

#[test]
fn test_stale_page_completion_is_not_applied() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::NavigatePage(2));
    harness.drain_effects();

    // The page-1 response lands after the user moved to page 2.
    harness.complete_action(Action::PageDidLoad {
        offset: 0,
        page: page_of(1..21, 1302, true),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!(total, 1);
    assert_eq!(changed, 0, "stale completion must not change state");
    harness.assert_state(|s| s.page_data.is_loading());
}

// ============================================================================
// Mode switching and history
// ============================================================================

#[test]
fn test_mode_switch_clears_the_page_and_starts_at_offset_zero() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::NavigatePage(5));
    harness.assert_state(|s| s.history.current() == "/?page=5");
    harness.drain_effects();

    harness.dispatch_collect(Action::NavigateMode(ViewMode::Incremental));

    harness.assert_state(|s| s.history.current() == "/?view=loadmore");
    harness.assert_state(|s| s.page == 1);
    harness.assert_state(|s| s.feed.items().is_empty());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadFeedPage {
                limit: 20,
                offset: 0
            }
        )
    });
}

#[test]
fn test_back_and_forward_rederive_state_from_the_location() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::NavigatePage(3));
    harness.dispatch_collect(Action::NavigateDetail(25));
    harness.drain_effects();

    harness.dispatch_collect(Action::NavigateBack);
    harness.assert_state(|s| s.history.current() == "/?page=3");
    harness.assert_state(|s| s.detail_target.is_none());
    harness.assert_state(|s| s.page == 3);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadPage {
                limit: 20,
                offset: 40
            }
        )
    });

    harness.dispatch_collect(Action::NavigateForward);
    harness.assert_state(|s| s.history.current() == "/pokemon/25");
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::LoadDetail { id: 25 }));
}

// ============================================================================
// Load-more feed
// ============================================================================

#[test]
fn test_feed_accumulates_and_stops_at_the_last_page() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::NavigateMode(ViewMode::Incremental));
    harness.drain_effects();

    harness.complete_action(Action::FeedDidLoad {
        offset: 0,
        page: page_of(1..21, 30, true),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.feed.items().len() == 20);

    harness.dispatch_collect(Action::FeedLoadNext);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadFeedPage {
                limit: 20,
                offset: 20
            }
        )
    });

    harness.complete_action(Action::FeedDidLoad {
        offset: 20,
        page: page_of(21..31, 30, false),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.feed.items().len() == 30);
    harness.assert_state(|s| !s.feed.has_next());

    // Exhausted: no fetch, and the status line reports it.
    harness.dispatch_collect(Action::FeedLoadNext);
    let effects = harness.drain_effects();
    effects.effects_empty();
    harness.assert_state(|s| s.message.as_deref() == Some("Nothing more to load."));
}

#[test]
fn test_feed_error_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::NavigateMode(ViewMode::Incremental));
    harness.drain_effects();

    harness.complete_action(Action::FeedDidError {
        offset: 0,
        error: "Failed to fetch data: connection refused".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.feed_fetch.is_failed());

    harness.dispatch_collect(Action::Retry);
    harness.assert_state(|s| s.feed_fetch.is_loading());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadFeedPage {
                limit: 20,
                offset: 0
            }
        )
    });
}

// ============================================================================
// Detail screen
// ============================================================================

#[test]
fn test_detail_fetch_flow() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::NavigateDetail(25));
    harness.assert_state(|s| s.history.current() == "/pokemon/25");
    harness.assert_state(|s| s.detail_data.is_loading());

    harness.complete_action(Action::DetailDidLoad(pikachu()));
    harness.process_emitted();

    harness.assert_state(|s| s.detail_data.is_loaded());
    harness.assert_state(|s| s.detail_data.data().unwrap().name == "pikachu");
}

#[test]
fn test_detail_error_shows_retry_and_reissues_one_fetch() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.dispatch_collect(Action::NavigateDetail(9999));
    harness.drain_effects();

    harness.complete_action(Action::DetailDidError {
        id: 9999,
        error: "Failed to fetch data: status 404".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.detail_data.is_failed());

    harness.dispatch_collect(Action::Retry);
    harness.assert_state(|s| s.detail_data.is_loading());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadDetail { id: 9999 }));
}

#[test]
fn test_invalid_goto_id_never_fetches() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.dispatch_collect(Action::GotoOpen);
    harness.dispatch_collect(Action::GotoSubmit("abc".into()));

    let effects = harness.drain_effects();
    effects.effects_empty();
    harness.assert_state(|s| s.goto.error.as_deref() == Some("'abc' is not a valid Pokémon id"));
    harness.assert_state(|s| s.detail_target.is_none());
}

#[test]
fn test_valid_goto_id_navigates_to_the_detail_route() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.dispatch_collect(Action::GotoOpen);
    harness.dispatch_collect(Action::GotoSubmit(" 25 ".into()));

    harness.assert_state(|s| s.history.current() == "/pokemon/25");
    harness.assert_state(|s| !s.goto.active);
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| matches!(e, Effect::LoadDetail { id: 25 }));
}
