use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{Component, ACCENT, DIM};
use crate::action::Action;
use crate::state::ViewMode;

/// Title, mode tabs and the current location string.
pub struct NavHeader;

pub struct NavHeaderProps<'a> {
    pub mode: ViewMode,
    /// Current history entry, shown as the address-bar readout.
    pub location: &'a str,
    pub is_detail: bool,
}

impl NavHeader {
    fn tab(label: &str, active: bool) -> Span<'static> {
        let text = format!(" {label} ");
        if active {
            Span::styled(text, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(text, Style::default().fg(DIM))
        }
    }
}

impl Component<Action> for NavHeader {
    type Props<'a> = NavHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let tabs = if props.is_detail {
            Line::from(vec![Span::styled(
                " Detail ",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )])
        } else {
            Line::from(vec![
                Self::tab(
                    ViewMode::Paginated.label(),
                    props.mode == ViewMode::Paginated,
                ),
                Span::raw("|"),
                Self::tab(
                    ViewMode::Incremental.label(),
                    props.mode == ViewMode::Incremental,
                ),
            ])
        };

        let lines = vec![
            Line::from(Span::styled(
                "⚡ Pokédex",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            tabs,
            Line::from(Span::styled(
                format!("location: {}", props.location),
                Style::default().fg(DIM),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn test_render_shows_tabs_and_location() {
        let mut render = RenderHarness::new(60, 6);
        let mut component = NavHeader;

        let output = render.render_to_string_plain(|frame| {
            let props = NavHeaderProps {
                mode: ViewMode::Paginated,
                location: "/?page=3",
                is_detail: false,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Pokédex"));
        assert!(output.contains("Pagination"));
        assert!(output.contains("Load More"));
        assert!(output.contains("location: /?page=3"));
    }

    #[test]
    fn test_render_detail_replaces_tabs() {
        let mut render = RenderHarness::new(60, 6);
        let mut component = NavHeader;

        let output = render.render_to_string_plain(|frame| {
            let props = NavHeaderProps {
                mode: ViewMode::Paginated,
                location: "/pokemon/25",
                is_detail: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Detail"));
        assert!(!output.contains("Load More"));
    }
}
