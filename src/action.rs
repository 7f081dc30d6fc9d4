//! Actions - user intent plus async completion events

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{CatalogPage, PokemonDetail, ViewMode};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Apply the initial location and fetch its data
    Init,

    // ===== Navigation (pushes a history entry, then re-derives from it) =====
    /// Switch browse mode; always resets to the start of the new mode
    NavigateMode(ViewMode),

    /// Go to a 1-based page in paginated mode
    NavigatePage(u32),

    /// Open the detail screen for an id
    NavigateDetail(u32),

    /// Browser-style back
    NavigateBack,

    /// Browser-style forward
    NavigateForward,

    // ===== Grid selection =====
    SelectionMove(i32),
    SelectionSet(usize),

    // ===== Paginated list results =====
    PageDidLoad { offset: u32, page: CatalogPage },
    PageDidError { offset: u32, error: String },

    // ===== Load-more feed =====
    /// Fetch the page following the last loaded one; no-op when exhausted
    FeedLoadNext,
    FeedDidLoad { offset: u32, page: CatalogPage },
    FeedDidError { offset: u32, error: String },

    // ===== Detail results =====
    DetailDidLoad(PokemonDetail),
    DetailDidError { id: u32, error: String },

    // ===== Jump-to-id overlay =====
    GotoOpen,
    GotoClose,
    GotoChange(String),
    GotoSubmit(String),

    /// Re-issue the fetch for the failed (or current) region
    Retry,

    /// Force a re-render (cursor movement, etc.)
    Render,

    #[action(category = "ui")]
    UiTerminalResize(u16, u16),

    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
