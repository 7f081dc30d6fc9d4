pub mod catalog_grid;
pub mod detail_panel;
pub mod goto_overlay;
pub mod load_more_bar;
pub mod nav_header;
pub mod pagination_bar;
pub mod recovery_panel;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_grid::{CatalogGrid, CatalogGridProps};
pub use detail_panel::{DetailPanel, DetailPanelProps};
pub use goto_overlay::{GotoOverlay, GotoOverlayProps};
pub use load_more_bar::{LoadMoreBar, LoadMoreBarProps};
pub use nav_header::{NavHeader, NavHeaderProps};
pub use pagination_bar::{visible_pages, PageSlot, PaginationBar, PaginationBarProps};
pub use recovery_panel::{RecoveryPanel, RecoveryPanelProps};

use ratatui::style::Color;

pub(crate) const ACCENT: Color = Color::Yellow;
pub(crate) const DIM: Color = Color::DarkGray;
pub(crate) const FAILURE: Color = Color::Red;

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Loading spinner frame for the current tick.
pub(crate) fn spinner(tick: u64) -> char {
    SPINNER_FRAMES[(tick / 2) as usize % SPINNER_FRAMES.len()]
}

/// API names are lowercase; show them with a leading capital.
pub(crate) fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_capitalizes_the_first_letter() {
        assert_eq!(display_name("pikachu"), "Pikachu");
        assert_eq!(display_name("mr-mime"), "Mr-mime");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn spinner_cycles_through_frames() {
        let frames: Vec<char> = (0..8).map(spinner).collect();
        assert_eq!(frames[0], frames[1]);
        assert_ne!(frames[0], frames[2]);
    }
}
