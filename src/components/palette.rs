use futsal_api::MatchResult;
use tui::style::{Color, Modifier, Style};

/// Hero backdrop behind the glow.
pub const BACKDROP: (u8, u8, u8) = (14, 11, 24);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SquadColor {
    Primary,
    Accent,
    Tagline,
    Dim,
    Highlight,
    Squad,
    Guest,
    Result(MatchResult),
}

pub fn resolve(color: SquadColor) -> Style {
    match color {
        SquadColor::Primary => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        SquadColor::Accent => Style::default().fg(Color::Rgb(167, 139, 250)).add_modifier(Modifier::BOLD),
        SquadColor::Tagline => Style::default().fg(Color::Rgb(196, 181, 253)),
        SquadColor::Dim => Style::default().fg(Color::Indexed(244)),
        SquadColor::Highlight => Style::default().fg(Color::Black).bg(Color::Rgb(167, 139, 250)),
        SquadColor::Squad => Style::default().fg(Color::Cyan),
        SquadColor::Guest => Style::default().fg(Color::Indexed(244)).add_modifier(Modifier::ITALIC),
        SquadColor::Result(MatchResult::Win) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        SquadColor::Result(MatchResult::Loss) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        SquadColor::Result(MatchResult::Draw) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    }
}

/// Stat bar colour by value, like a ratings card.
pub fn stat_color(value: f64) -> Color {
    match value {
        v if v >= 80.0 => Color::Green,
        v if v >= 65.0 => Color::LightGreen,
        v if v >= 50.0 => Color::Yellow,
        _ => Color::Red,
    }
}

pub fn blend(base: (u8, u8, u8), top: (u8, u8, u8), alpha: f64) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |b: u8, t: u8| (f64::from(b) * (1.0 - a) + f64::from(t) * a).round() as u8;
    Color::Rgb(mix(base.0, top.0), mix(base.1, top.1), mix(base.2, top.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend((0, 0, 0), (200, 100, 50), 0.0), Color::Rgb(0, 0, 0));
        assert_eq!(blend((0, 0, 0), (200, 100, 50), 1.0), Color::Rgb(200, 100, 50));
        assert_eq!(blend((0, 0, 0), (200, 100, 50), 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(blend((0, 0, 0), (200, 100, 50), 7.0), Color::Rgb(200, 100, 50));
    }

    #[test]
    fn test_stat_color_bands() {
        assert_eq!(stat_color(92.0), Color::Green);
        assert_eq!(stat_color(65.0), Color::LightGreen);
        assert_eq!(stat_color(50.0), Color::Yellow);
        assert_eq!(stat_color(0.0), Color::Red);
    }
}
