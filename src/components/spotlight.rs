use crate::components::palette::{SquadColor, resolve, stat_color};
use futsal_api::stats::{self, StatLine};
use futsal_api::{Player, PlayerVersion};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Widget};

const BAR_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 12;

/// Everything the spotlight card shows for one player, resolved up front.
pub struct SpotlightCard<'a> {
    pub player: &'a Player,
    pub version_key: &'a str,
    pub version: &'a PlayerVersion,
    pub global_version: &'a str,
    pub overridden: bool,
    pub appearances: u32,
    pub average_rating: Option<f64>,
    pub position: (usize, usize),
}

impl Widget for SpotlightCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " Player Stats  {}/{}  global {} ",
            self.position.0 + 1,
            self.position.1,
            self.global_version.to_uppercase()
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title);

        let stats = &self.version.stats;
        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!(" {:>3} ", stats::calculate_ovr(stats)), resolve(SquadColor::Highlight)),
                Span::raw("  "),
                Span::styled(self.player.name.clone(), resolve(SquadColor::Primary)),
            ]),
            Line::from(Span::styled(self.player.role.label(), resolve(SquadColor::Dim))),
            Line::from(vec![
                Span::raw("Version: "),
                Span::styled(self.version_key.to_uppercase(), resolve(SquadColor::Accent)),
                Span::styled(
                    if self.overridden { "  (player pick)" } else { "" },
                    resolve(SquadColor::Dim),
                ),
            ]),
            Line::default(),
        ];

        lines.extend(
            stats::displayed_attributes(self.player, stats)
                .into_iter()
                .map(stat_row),
        );

        lines.push(Line::default());
        lines.push(Line::from(format!("Apps: {}", self.appearances)));
        lines.push(Line::from(format!(
            "Overall Rating: {} /10",
            format_rating(self.average_rating)
        )));
        if let Some(image) = self.version.image.as_deref() {
            lines.push(Line::from(Span::styled(format!("img {image}"), resolve(SquadColor::Dim))));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

fn stat_row(line: StatLine) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<LABEL_WIDTH$}", line.label)),
        Span::styled(stat_bar(line.value, BAR_WIDTH), Style::default().fg(stat_color(line.value))),
        Span::raw(format!(" {}", format_stat(line.value))),
    ])
}

/// Fixed-width bar, filled in proportion to a 0–100 value.
pub fn stat_bar(value: f64, width: usize) -> String {
    let filled = ((value.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// One decimal, or a dash when the player has no rated appearance.
pub fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| "—".to_string(), |r| format!("{r:.1}"))
}
