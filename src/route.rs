//! Location strings and navigation history.
//!
//! The current history entry is the single source of truth for what is on
//! screen: every navigation (push, back, forward) re-parses it into a
//! [`Route`] and the reducer rebuilds state from that. Serialization rules:
//! paginated browsing is the implicit default, `?view=loadmore` marks the
//! incremental mode (which never carries a page cursor), and `?page=N` is a
//! 1-based page number that only appears in paginated mode.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::ViewMode;

pub const VIEW_PARAM: &str = "view";
pub const PAGE_PARAM: &str = "page";
pub const LOADMORE_VALUE: &str = "loadmore";

/// Browse-mode view state as carried by the location string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    /// 1-based page, always 1 in incremental mode.
    pub page: u32,
}

impl ViewState {
    pub fn paginated(page: u32) -> Self {
        Self {
            mode: ViewMode::Paginated,
            page: page.max(1),
        }
    }

    pub fn incremental() -> Self {
        Self {
            mode: ViewMode::Incremental,
            page: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Browse(ViewState),
    /// Raw id segment of `/pokemon/{id}`; validated by the reducer before any
    /// fetch is issued.
    Detail(String),
}

impl Route {
    pub fn parse(location: &str) -> Route {
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, query),
            None => (location, ""),
        };

        if let Some(raw) = path.strip_prefix("/pokemon/") {
            return Route::Detail(raw.trim_end_matches('/').to_string());
        }

        let mut mode = ViewMode::Paginated;
        let mut page = 1u32;
        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                VIEW_PARAM if value == LOADMORE_VALUE => mode = ViewMode::Incremental,
                // Non-numeric or missing page defaults to 1; no clamping
                // against the total, out-of-range pages render empty.
                PAGE_PARAM => page = value.parse().unwrap_or(1).max(1),
                _ => {}
            }
        }

        match mode {
            ViewMode::Paginated => Route::Browse(ViewState::paginated(page)),
            ViewMode::Incremental => Route::Browse(ViewState::incremental()),
        }
    }

    pub fn to_location(&self) -> String {
        match self {
            Route::Browse(view) => match view.mode {
                ViewMode::Incremental => format!("/?{VIEW_PARAM}={LOADMORE_VALUE}"),
                ViewMode::Paginated if view.page > 1 => format!("/?{PAGE_PARAM}={}", view.page),
                ViewMode::Paginated => "/".to_string(),
            },
            Route::Detail(raw) => format!("/pokemon/{raw}"),
        }
    }
}

/// Push-navigation history over location strings, with browser-style
/// back/forward. Pushing while somewhere in the middle discards the forward
/// branch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Route::Browse(ViewState::paginated(1)).to_location())
    }
}

impl History {
    pub fn new(initial: String) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    pub fn push(&mut self, location: String) {
        if self.current() == location {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index += 1;
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn can_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachable_routes_round_trip() {
        let routes = [
            Route::Browse(ViewState::paginated(1)),
            Route::Browse(ViewState::paginated(2)),
            Route::Browse(ViewState::paginated(66)),
            Route::Browse(ViewState::paginated(999)),
            Route::Browse(ViewState::incremental()),
            Route::Detail("25".to_string()),
            Route::Detail("abc".to_string()),
        ];
        for route in routes {
            let location = route.to_location();
            assert_eq!(Route::parse(&location), route, "via {location}");
        }
    }

    #[test]
    fn paginated_default_has_no_view_marker() {
        assert_eq!(Route::Browse(ViewState::paginated(1)).to_location(), "/");
        assert_eq!(
            Route::Browse(ViewState::paginated(3)).to_location(),
            "/?page=3"
        );
        assert_eq!(
            Route::Browse(ViewState::incremental()).to_location(),
            "/?view=loadmore"
        );
    }

    #[test]
    fn missing_or_invalid_page_defaults_to_one() {
        assert_eq!(Route::parse("/"), Route::Browse(ViewState::paginated(1)));
        assert_eq!(
            Route::parse("/?page=abc"),
            Route::Browse(ViewState::paginated(1))
        );
        assert_eq!(
            Route::parse("/?page="),
            Route::Browse(ViewState::paginated(1))
        );
        assert_eq!(
            Route::parse("/?page=0"),
            Route::Browse(ViewState::paginated(1))
        );
    }

    #[test]
    fn out_of_range_pages_are_not_clamped() {
        assert_eq!(
            Route::parse("/?page=999"),
            Route::Browse(ViewState::paginated(999))
        );
    }

    #[test]
    fn incremental_mode_ignores_page_parameter() {
        assert_eq!(
            Route::parse("/?view=loadmore&page=5"),
            Route::Browse(ViewState::incremental())
        );
        assert_eq!(
            Route::parse("/?page=5&view=loadmore"),
            Route::Browse(ViewState::incremental())
        );
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        assert_eq!(
            Route::parse("/?utm_source=share&page=2"),
            Route::Browse(ViewState::paginated(2))
        );
    }

    #[test]
    fn detail_route_keeps_raw_segment() {
        assert_eq!(Route::parse("/pokemon/25"), Route::Detail("25".into()));
        assert_eq!(Route::parse("/pokemon/25/"), Route::Detail("25".into()));
        assert_eq!(Route::parse("/pokemon/abc"), Route::Detail("abc".into()));
    }

    #[test]
    fn history_back_and_forward_walk_entries() {
        let mut history = History::new("/".to_string());
        history.push("/?page=2".to_string());
        history.push("/pokemon/25".to_string());

        assert_eq!(history.current(), "/pokemon/25");
        assert!(history.back());
        assert_eq!(history.current(), "/?page=2");
        assert!(history.back());
        assert_eq!(history.current(), "/");
        assert!(!history.back());

        assert!(history.forward());
        assert_eq!(history.current(), "/?page=2");
        assert!(history.forward());
        assert!(!history.forward());
    }

    #[test]
    fn push_discards_the_forward_branch() {
        let mut history = History::new("/".to_string());
        history.push("/?page=2".to_string());
        history.push("/?page=3".to_string());
        history.back();
        history.back();
        history.push("/?view=loadmore".to_string());

        assert_eq!(history.current(), "/?view=loadmore");
        assert!(!history.forward());
        assert!(history.back());
        assert_eq!(history.current(), "/");
    }

    #[test]
    fn push_of_the_current_location_is_a_no_op() {
        let mut history = History::new("/".to_string());
        history.push("/".to_string());
        assert!(!history.can_back());
        assert!(!history.can_forward());
    }
}
