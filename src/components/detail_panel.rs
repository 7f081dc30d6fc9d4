use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{display_name, Component, ACCENT, DIM};
use crate::action::Action;
use crate::state::{PokemonDetail, STAT_MAX};

/// Stat display order and labels, matching the API stat names.
const DISPLAY_STATS: [(&str, &str); 6] = [
    ("hp", "HP"),
    ("attack", "Attack"),
    ("defense", "Defense"),
    ("special-attack", "Sp. Attack"),
    ("special-defense", "Sp. Defense"),
    ("speed", "Speed"),
];

const STAT_BAR_WIDTH: usize = 20;

/// Full record view for one Pokémon.
pub struct DetailPanel;

pub struct DetailPanelProps<'a> {
    pub detail: &'a PokemonDetail,
}

fn stat_line(label: &str, value: u16) -> Line<'static> {
    let filled = (value as usize * STAT_BAR_WIDTH / STAT_MAX as usize).min(STAT_BAR_WIDTH);
    let bar: String = "█".repeat(filled) + &"░".repeat(STAT_BAR_WIDTH - filled);
    Line::from(vec![
        Span::raw(format!("{label:<12} ")),
        Span::styled(bar, Style::default().fg(ACCENT)),
        Span::raw(format!(" {value:>3}")),
    ])
}

impl Component<Action> for DetailPanel {
    type Props<'a> = DetailPanelProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let detail = props.detail;
        let chunks = Layout::vertical([
            Constraint::Length(2), // Name header
            Constraint::Min(1),    // Body
        ])
        .split(area);

        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                format!("⚡ {}", display_name(&detail.name)),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("#{:03}", detail.id),
                Style::default().fg(DIM),
            )),
        ]);
        frame.render_widget(header, chunks[0]);

        let body = Layout::horizontal([
            Constraint::Length(32), // Portrait and measurements
            Constraint::Min(1),     // Stats and abilities
        ])
        .split(chunks[1]);

        let types = detail
            .types
            .iter()
            .map(|kind| format!("[{kind}]"))
            .collect::<Vec<_>>()
            .join(" ");
        // The sprite itself is not decoded; the card shows a placeholder glyph
        // and the artwork URL.
        let artwork = detail
            .artwork_url
            .as_deref()
            .unwrap_or("(no artwork available)");
        let left_lines = vec![
            Line::from(""),
            Line::from(Span::styled("   ◓", Style::default().fg(ACCENT))),
            Line::from(""),
            Line::from(Span::styled(types, Style::default().fg(ACCENT))),
            Line::from(""),
            Line::from(format!("Height  {:.1} m", detail.height as f32 / 10.0)),
            Line::from(format!("Weight  {:.1} kg", detail.weight as f32 / 10.0)),
            Line::from(""),
            Line::from(Span::styled(artwork.to_string(), Style::default().fg(DIM))),
        ];
        let left = Paragraph::new(left_lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::RIGHT).border_style(Style::default().fg(DIM)));
        frame.render_widget(left, body[0]);

        let mut right_lines = vec![Line::from(Span::styled(
            "Base Stats",
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        for (name, label) in DISPLAY_STATS {
            right_lines.push(stat_line(label, detail.stat(name)));
        }
        right_lines.push(Line::from(""));
        right_lines.push(Line::from(Span::styled(
            "Abilities",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for ability in &detail.abilities {
            let mut spans = vec![Span::raw(format!("• {}", display_name(&ability.name)))];
            if ability.is_hidden {
                spans.push(Span::styled(" (hidden)", Style::default().fg(DIM)));
            }
            right_lines.push(Line::from(spans));
        }
        right_lines.push(Line::from(""));
        if let Some(xp) = detail.base_experience {
            right_lines.push(Line::from(vec![
                Span::styled("Base Experience  ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!("{xp} XP"), Style::default().fg(ACCENT)),
            ]));
        }

        let right = Paragraph::new(right_lines).wrap(Wrap { trim: false });
        frame.render_widget(right, body[1]);
    }
}
