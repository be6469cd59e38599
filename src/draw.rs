use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, MenuItem};
use crate::components::hero::HeroBanner;
use crate::components::palette::{SquadColor, resolve};
use crate::components::spotlight::{SpotlightCard, format_rating};
use crate::state::app_state::{MatchListState, SquadState};
use crate::state::loader::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use futsal_api::stats;
use futsal_api::{Match, MatchParticipant, Player};
use log::error;

static TABS: &[&str; 2] = &["Squad", "Matches"];

const HELP_TEXT: &[(&str, &str)] = &[
    ("1 / 2 / ?", "Squad / Matches / Help"),
    ("h ← / l →", "previous / next player"),
    ("g / G", "global version forward / back"),
    ("v / V", "cycle this player's version / back to global"),
    ("space / p", "play the team chant"),
    ("c", "jump to the coach"),
    ("j ↓ / k ↑", "move through matches"),
    ("Enter", "open / close the selected match"),
    ("J / K", "move through players in the open match"),
    ("s", "show the selected player"),
    ("r", "reload the team"),
    ("f", "full screen"),
    ("\"", "log panel"),
    ("q / Ctrl-c", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Squad => draw_squad(f, layout.main, app),
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Squad => 0,
        MenuItem::Matches => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Squad tab
// ---------------------------------------------------------------------------

fn draw_squad(f: &mut Frame, area: Rect, app: &App) {
    let Some(squad) = app.state.squad.as_ref() else {
        draw_not_loaded(f, area, app);
        return;
    };

    let (hero_area, side_area) = if area.width >= 90 {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Fill(1)]).areas(area);
        (left, right)
    } else {
        let [top, bottom] = Layout::vertical([Constraint::Length(9), Constraint::Fill(1)]).areas(area);
        (top, bottom)
    };

    f.render_widget(
        HeroBanner {
            name: &squad.team.name,
            tagline: squad.team.tagline.as_deref(),
            surfaces: app.chant.surfaces(),
            playing: app.chant.is_active(),
        },
        hero_area,
    );

    let [stats_area, card_area] =
        Layout::vertical([Constraint::Length(7), Constraint::Fill(1)]).areas(side_area);
    draw_squad_stats(f, stats_area, squad);
    draw_spotlight(f, card_area, app, squad);
}

fn draw_squad_stats(f: &mut Frame, area: Rect, squad: &SquadState) {
    let block = default_border(Color::White).title(" Squad Stats ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let record = squad.summary.team_stats;
    let label = resolve(SquadColor::Dim);
    let value = resolve(SquadColor::Primary);

    let mut lines = vec![Line::from(vec![
        Span::styled("Wins ", label),
        Span::styled(record.wins.to_string(), value),
        Span::styled("   Losses ", label),
        Span::styled(record.losses.to_string(), value),
        Span::styled("   Goals ", label),
        Span::styled(record.goals_for.to_string(), value),
        Span::styled("   Matches ", label),
        Span::styled(record.total_matches.to_string(), value),
    ])];

    let coach = stats::find_player_index(&squad.team.players, &squad.team.coach)
        .and_then(|i| squad.team.players.get(i))
        .map_or(squad.team.coach.as_str(), |p| p.name.as_str());
    lines.push(Line::from(vec![
        Span::styled("Coach ", label),
        Span::styled(coach.to_string(), resolve(SquadColor::Accent)),
        Span::styled("  [c]", label),
    ]));

    if let Some(next) = squad.team.next_game.as_ref() {
        lines.push(Line::from(vec![
            Span::styled("Next  ", label),
            Span::styled(format!("vs {}", next.team), value),
            Span::raw(format!("  {}", next.date)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {} · {} confirmed", next.court, next.participants.len()),
            label,
        )));
    }

    lines.push(Line::from(Span::styled(
        format!("loaded {}", squad.loaded_at.format("%H:%M:%S")),
        label,
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_spotlight(f: &mut Frame, area: Rect, app: &App, squad: &SquadState) {
    let spotlight = &app.state.spotlight;
    let players = &squad.team.players;

    let Some(player) = spotlight.current(players) else {
        draw_placeholder(f, area, "No players in this squad");
        return;
    };
    let version_key = spotlight.resolved_version(player);
    let Some(version) = player.versions.get(version_key) else {
        draw_placeholder(f, area, "No stats for this player");
        return;
    };

    f.render_widget(
        SpotlightCard {
            player,
            version_key,
            version,
            global_version: &spotlight.global_version,
            overridden: spotlight.has_override(player),
            appearances: squad.summary.appearances_for(&player.id),
            average_rating: squad.summary.average_rating_for(&player.id),
            position: (spotlight.index, players.len()),
        },
        area,
    );
}

// ---------------------------------------------------------------------------
// Matches tab
// ---------------------------------------------------------------------------

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let Some(squad) = app.state.squad.as_ref() else {
        draw_not_loaded(f, area, app);
        return;
    };

    let block = default_border(Color::White).title(" Match History ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if squad.team.matches.is_empty() {
        f.render_widget(
            Paragraph::new("No matches played yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let (lines, cursor_line) = match_lines(&squad.team.matches, &squad.team.players, &app.state.matches);
    let offset = cursor_line.saturating_sub(inner.height.saturating_sub(1) as usize);
    f.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), inner);
}

/// Rows for the match list plus the line index of the selected row.
fn match_lines<'a>(
    matches: &'a [Match],
    players: &[Player],
    list: &MatchListState,
) -> (Vec<Line<'a>>, usize) {
    let mut lines = Vec::with_capacity(matches.len());
    let mut cursor_line = 0;

    for (idx, m) in matches.iter().enumerate() {
        let selected = idx == list.selected;
        if selected {
            cursor_line = lines.len();
        }
        lines.push(match_row(m, selected));

        if list.expanded == Some(idx) {
            if m.participants.is_empty() {
                lines.push(Line::from(Span::styled(
                    "      no line-up recorded",
                    resolve(SquadColor::Dim),
                )));
            }
            for (p_idx, participant) in m.participants.iter().enumerate() {
                lines.push(participant_chip(participant, players, p_idx == list.participant));
            }
        }
    }

    (lines, cursor_line)
}

fn match_row(m: &Match, selected: bool) -> Line<'_> {
    let result = m.result();
    let marker = if selected { ">" } else { " " };
    let mut row_style = resolve(SquadColor::Result(result));
    if selected {
        row_style = row_style.add_modifier(Modifier::REVERSED);
    }
    Line::from(vec![
        Span::raw(format!("{marker} ")),
        Span::styled(format!(" {} ", result.label()), row_style),
        Span::raw(format!("  vs {:<22}", m.team)),
        Span::styled(format!("{:<14}", m.date), resolve(SquadColor::Dim)),
        Span::styled(format!("{}–{}", m.our_goals, m.their_goals), resolve(SquadColor::Primary)),
    ])
}

fn participant_chip(participant: &MatchParticipant, players: &[Player], under_cursor: bool) -> Line<'static> {
    let member = stats::is_squad_member(players, &participant.id);
    let style = if under_cursor {
        resolve(SquadColor::Highlight)
    } else if member {
        resolve(SquadColor::Squad)
    } else {
        resolve(SquadColor::Guest)
    };
    Line::from(vec![
        Span::raw(if under_cursor { "    ▸ " } else { "      " }),
        Span::styled(format!(" {} ", participant_label(participant, member)), style),
        Span::styled(format!("  {}", format_rating(participant.rating)), resolve(SquadColor::Dim)),
    ])
}

fn participant_label(participant: &MatchParticipant, member: bool) -> String {
    if member {
        participant.id.clone()
    } else {
        format!("{} (Guest)", participant.id)
    }
}

// ---------------------------------------------------------------------------
// Help, logs, spinner
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:>12}  "), resolve(SquadColor::Accent)),
                Span::raw(*action),
            ])
        })
        .chain(std::iter::once(Line::from(Span::styled(
            "Esc to go back",
            resolve(SquadColor::Dim),
        ))))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_not_loaded(f: &mut Frame, area: Rect, app: &App) {
    let msg = match app.state.last_error.as_deref() {
        Some(err) => format!("Team load failed:\n{err}\n\nPress r to retry"),
        None => "Loading squad...".to_string(),
    };
    draw_placeholder(f, area, &msg);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
