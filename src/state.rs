//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::route::{History, Route};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Base-stat ceiling used for proportional stat bars.
pub const STAT_MAX: u16 = 255;

/// Minimal identity from a paged listing; immutable once fetched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub id: u32,
    pub name: String,
    pub summary_url: String,
}

/// One page of catalog entries, keyed upstream by `(limit, offset)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogPage {
    pub items: Vec<CatalogEntry>,
    pub total_count: u32,
    /// Continuation marker from the server (`next` link present).
    pub has_next: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonStat {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonAbility {
    pub name: String,
    pub is_hidden: bool,
}

/// Full per-Pokemon record; fetched lazily per id, cached by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub abilities: Vec<PokemonAbility>,
    /// Decimetres, as reported by the API.
    pub height: u32,
    /// Hectograms, as reported by the API.
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub artwork_url: Option<String>,
}

impl PokemonDetail {
    pub fn stat(&self, name: &str) -> u16 {
        self.stats
            .iter()
            .find(|stat| stat.name == name)
            .map(|stat| stat.value)
            .unwrap_or(0)
    }
}

/// How the browse screen loads its list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ViewMode {
    #[default]
    Paginated,
    Incremental,
}

impl ViewMode {
    pub fn toggle(&self) -> Self {
        match self {
            ViewMode::Paginated => ViewMode::Incremental,
            ViewMode::Incremental => ViewMode::Paginated,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Paginated => "Pagination",
            ViewMode::Incremental => "Load More",
        }
    }
}

/// What the detail screen was asked to show. Invalid ids are caught before
/// any fetch is issued.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum DetailTarget {
    Id(u32),
    Invalid(String),
}

/// Append-only accumulation of catalog pages for the load-more mode.
///
/// The item sequence preserves page-fetch order and `has_next` derives solely
/// from the most recently pushed page's continuation marker.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoadMoreFeed {
    items: Vec<CatalogEntry>,
    pages_loaded: u32,
    total_count: u32,
    exhausted: bool,
}

impl LoadMoreFeed {
    pub fn items(&self) -> &[CatalogEntry] {
        &self.items
    }

    pub fn pages_loaded(&self) -> u32 {
        self.pages_loaded
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Offset of the page immediately following the last loaded one.
    pub fn next_offset(&self, page_size: u32) -> u32 {
        self.pages_loaded * page_size
    }

    /// False once a fetched page reported no continuation marker; true for an
    /// empty feed (nothing fetched yet).
    pub fn has_next(&self) -> bool {
        !self.exhausted
    }

    pub fn push_page(&mut self, page: CatalogPage) {
        self.items.extend(page.items);
        self.pages_loaded += 1;
        self.total_count = page.total_count;
        self.exhausted = !page.has_next;
    }
}

/// Jump-to-id overlay state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GotoState {
    pub active: bool,
    pub input: String,
    pub error: Option<String>,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Navigation history; the current entry is re-parsed on every navigation
    #[debug(section = "Route", label = "History", debug_fmt)]
    pub history: History,

    /// Browse mode derived from the current location
    #[debug(section = "Route", label = "Mode", debug_fmt)]
    pub mode: ViewMode,

    /// 1-based page in paginated mode
    #[debug(section = "Route", label = "Page", debug_fmt)]
    pub page: u32,

    /// Detail screen target, if any
    #[debug(section = "Route", label = "Detail", debug_fmt)]
    pub detail_target: Option<DetailTarget>,

    /// Current page lifecycle: Empty -> Loading -> Loaded/Failed
    #[debug(section = "Data", label = "Page", debug_fmt)]
    pub page_data: DataResource<CatalogPage>,

    /// In-flight load-more fetch; Loaded carries the offset that completed
    #[debug(section = "Data", label = "Feed fetch", debug_fmt)]
    pub feed_fetch: DataResource<u32>,

    /// Accumulated load-more items
    #[debug(skip)]
    pub feed: LoadMoreFeed,

    /// Detail record lifecycle for the current target
    #[debug(section = "Data", label = "Detail", debug_fmt)]
    pub detail_data: DataResource<PokemonDetail>,

    #[debug(skip)]
    pub page_size: u32,

    /// Grid selection cursor
    #[debug(skip)]
    pub selected_index: usize,

    #[debug(skip)]
    pub goto: GotoState,

    /// Status line message
    #[debug(section = "Status", label = "Message", debug_fmt)]
    pub message: Option<String>,

    #[debug(skip)]
    pub tick: u64,

    #[debug(skip)]
    pub terminal_size: (u16, u16),
}

impl AppState {
    pub fn new(page_size: u32, initial_location: String) -> Self {
        Self {
            history: History::new(initial_location),
            mode: ViewMode::Paginated,
            page: 1,
            detail_target: None,
            page_data: DataResource::Empty,
            feed_fetch: DataResource::Empty,
            feed: LoadMoreFeed::default(),
            detail_data: DataResource::Empty,
            page_size: page_size.max(1),
            selected_index: 0,
            goto: GotoState::default(),
            message: None,
            tick: 0,
            terminal_size: (80, 24),
        }
    }

    pub fn current_route(&self) -> Route {
        Route::parse(self.history.current())
    }

    pub fn is_detail(&self) -> bool {
        self.detail_target.is_some()
    }

    /// Offset requested from the catalog for a 1-based page.
    pub fn offset_for_page(&self, page: u32) -> u32 {
        (page.max(1) - 1) * self.page_size
    }

    /// Total page count once the catalog has reported its size.
    pub fn total_pages(&self) -> Option<u32> {
        let count = self.page_data.data().map(|page| page.total_count)?;
        Some(count.div_ceil(self.page_size))
    }

    /// Entries for the browse grid in the current mode.
    pub fn visible_entries(&self) -> &[CatalogEntry] {
        match self.mode {
            ViewMode::Paginated => self
                .page_data
                .data()
                .map(|page| page.items.as_slice())
                .unwrap_or(&[]),
            ViewMode::Incremental => self.feed.items(),
        }
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.visible_entries().get(self.selected_index)
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        let entries = self.visible_entries().len();
        if entries == 0 {
            let changed = self.selected_index != 0;
            self.selected_index = 0;
            return changed;
        }
        let bounded = index.min(entries - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn move_selection(&mut self, delta: i32) -> bool {
        let target = self.selected_index as i32 + delta;
        self.set_selected_index(target.max(0) as usize)
    }

    /// Whether the browse region is still waiting for its first data.
    pub fn browse_loading(&self) -> bool {
        match self.mode {
            ViewMode::Paginated => self.page_data.is_loading(),
            ViewMode::Incremental => self.feed_fetch.is_loading() && self.feed.items().is_empty(),
        }
    }

    pub fn any_loading(&self) -> bool {
        self.page_data.is_loading() || self.feed_fetch.is_loading() || self.detail_data.is_loading()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            DEFAULT_PAGE_SIZE,
            Route::Browse(crate::route::ViewState::paginated(1)).to_location(),
        )
    }
}
