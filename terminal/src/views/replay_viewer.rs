use super::View;
use crate::app::AppCommand;
use common::util::millis_to_clock;
use common::{EntitySnapshot, GamePlayer, GameReplay, GameTeam, ReplayClock, StateProjector};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Duration;
use tracing::warn;

/// The replay dashboard: team panels with per-player projected stats, a
/// detail panel for the selected player, and the scrubber controls.
pub struct ReplayViewerState {
    replay: GameReplay,
    projector: StateProjector,
    clock: ReplayClock,
    /// (team slot, player slot) pairs in display order
    roster: Vec<(usize, usize)>,
    selected: usize,
    exhausted: bool,
}

impl ReplayViewerState {
    pub fn new(replay: GameReplay) -> Self {
        let projector = StateProjector::new(&replay);
        let roster = replay
            .teams
            .iter()
            .enumerate()
            .flat_map(|(team_slot, team)| {
                (0..team.players.len()).map(move |player_slot| (team_slot, player_slot))
            })
            .collect();
        Self {
            replay,
            projector,
            clock: ReplayClock::new(),
            roster,
            selected: 0,
            exhausted: false,
        }
    }

    pub fn clock_snapshot(&self) -> common::ClockSnapshot {
        self.clock.snapshot()
    }

    /// True while playback is paused because the query time has passed all
    /// loaded data
    pub fn data_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn selected_player_id(&self) -> Option<u32> {
        self.selected_player().map(|(_, player)| player.id)
    }

    fn selected_player(&self) -> Option<(&GameTeam, &GamePlayer)> {
        let (team_slot, player_slot) = *self.roster.get(self.selected)?;
        let team = &self.replay.teams[team_slot];
        Some((team, &team.players[player_slot]))
    }

    fn query_ms(&self) -> u64 {
        self.clock.elapsed_millis()
    }
}

impl View for ReplayViewerState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char(' ') => {
                if self.clock.is_running() {
                    self.clock.stop();
                } else {
                    self.clock.start();
                }
                None
            }
            KeyCode::Char('r') => {
                self.clock.reset();
                None
            }
            KeyCode::Char('s') => {
                self.clock.cycle_rate();
                None
            }
            KeyCode::Char('h') => {
                self.clock.seek_by(-30.0);
                None
            }
            KeyCode::Char('l') => {
                self.clock.seek_by(30.0);
                None
            }
            KeyCode::Char('j') => {
                self.clock.seek_by(-5.0);
                None
            }
            KeyCode::Char('k') => {
                self.clock.seek_by(5.0);
                None
            }
            KeyCode::Down => {
                if self.selected < self.roster.len().saturating_sub(1) {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::BackToSelector),
            _ => None,
        }
    }

    fn update(&mut self, _dt: Duration) {
        let query_ms = self.query_ms();
        if self.clock.is_running() && self.projector.is_exhausted(query_ms) {
            // No fresher data to show; pause rather than extrapolate.
            // Fetching more states belongs to the upstream loader.
            self.clock.stop();
            self.exhausted = true;
            warn!(query_ms, "replay data exhausted, pausing playback");
        } else if self.exhausted && !self.projector.is_exhausted(query_ms) {
            self.exhausted = false;
        }
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),  // Header with game clock
                Constraint::Min(10),    // Team panels
                Constraint::Length(10), // Selected player detail
                Constraint::Length(4),  // Controls / warnings
            ])
            .split(frame.area());

        frame.render_widget(self.render_header(), chunks[0]);
        self.render_teams(frame, chunks[1]);
        frame.render_widget(self.render_detail(), chunks[2]);
        frame.render_widget(self.render_controls(), chunks[3]);
    }
}

impl ReplayViewerState {
    fn render_header(&self) -> Paragraph {
        let snap = self.clock.snapshot();
        let elapsed_ms = (snap.elapsed * 1000.0) as u64;
        let title = format!(
            "Game {} — {} | {} / {} | {}x | {}",
            self.replay.game_id,
            self.replay.description,
            millis_to_clock(Some(elapsed_ms)),
            millis_to_clock(Some(self.replay.game_length_ms)),
            snap.rate,
            if snap.running { "▶ Playing" } else { "⏸ Paused" }
        );

        Paragraph::new(title)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_teams(&self, frame: &mut Frame, area: Rect) {
        if self.replay.teams.is_empty() {
            let empty = Paragraph::new("No teams in this replay")
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, area);
            return;
        }

        let share = (100 / self.replay.teams.len()) as u16;
        let constraints: Vec<Constraint> = self
            .replay
            .teams
            .iter()
            .map(|_| Constraint::Percentage(share))
            .collect();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let query_ms = self.query_ms();
        for (team_slot, team) in self.replay.teams.iter().enumerate() {
            let color = team_color(&team.ui_color);
            let mut lines = Vec::new();

            for (player_slot, player) in team.players.iter().enumerate() {
                let state = self.projector.project(player.id, query_ms);
                let is_selected = self.roster.get(self.selected) == Some(&(team_slot, player_slot));
                lines.push(player_headline(player, state, color, is_selected));
                lines.push(player_statline(state));
            }

            let block = Block::default()
                .title(format!("{} [{}]", team.name, team.score))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color));
            frame.render_widget(Paragraph::new(lines).block(block), columns[team_slot]);
        }
    }

    fn render_detail(&self) -> Paragraph {
        let Some((team, player)) = self.selected_player() else {
            return Paragraph::new("No players in this replay")
                .block(Block::default().borders(Borders::ALL));
        };

        let color = team_color(&team.ui_color);
        let block = Block::default()
            .title(format!("{} — {}", player.name, player.position.label()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));

        let Some(state) = self.projector.project(player.id, self.query_ms()) else {
            return Paragraph::new("NO DATA").block(block);
        };

        let lines = vec![
            Line::from(format!(
                "Score {}  Spec {}  Lives {}  Shots {}",
                state.score,
                state.sp_available(),
                state.lives,
                state.shots
            )),
            Line::from(format!(
                "Accuracy {:.2}%  Hit Diff {:.2}  Assists {}  Medic Hits {}",
                state.accuracy * 100.0,
                state.hit_diff,
                state.assists,
                state.medic_hits
            )),
            Line::from(format!(
                "Shots Fired {}  Shots Hit {}  Shot Opponent {}  Deac Opponent {}",
                state.shots_fired, state.shots_hit, state.shot_opponent, state.deac_opponent
            )),
            Line::from(format!(
                "Times Hit {}  Times Deac-ed {}  Penalties {}",
                state.self_hit, state.self_deac, state.penalties
            )),
            Line::from(format!(
                "SP Earned {}  SP Spent {}  Resupplies (Shots) {}  Resupplies (Lives) {}",
                state.sp_earned, state.sp_spent, state.resupply_shots, state.resupply_lives
            )),
            Line::from(format!("As of {}", millis_to_clock(Some(state.state_time)))),
        ];

        Paragraph::new(lines).block(block)
    }

    fn render_controls(&self) -> Paragraph {
        let mut lines = vec![Line::from(
            "Space: Play/Pause | s: Speed | h/l: ±30s | j/k: ±5s | r: Reset | Up/Down: Select | q: Back",
        )];

        if self.exhausted {
            lines.push(Line::styled(
                format!(
                    "Out of recorded data — playback paused (data through {})",
                    millis_to_clock(self.projector.watermark())
                ),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(lines)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }
}

fn player_headline(
    player: &GamePlayer,
    state: Option<&EntitySnapshot>,
    color: Color,
    is_selected: bool,
) -> Line<'static> {
    let marker = if is_selected { "▸ " } else { "  " };
    let mut name_style = Style::default().fg(color);
    if is_selected {
        name_style = name_style.add_modifier(Modifier::BOLD);
    }
    if state.map(|s| s.is_eliminated).unwrap_or(false) {
        name_style = name_style.add_modifier(Modifier::CROSSED_OUT);
    }

    // Green while active, yellow when down for a resupply, red otherwise
    let light = match state {
        None => Color::Green,
        Some(s) if s.is_active => Color::Green,
        Some(s) if s.last_deac_type == Some(common::DeacType::Resupply) => Color::Yellow,
        Some(_) => Color::Red,
    };

    Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{} ", player.position.tag()), Style::default().fg(color)),
        Span::styled(player.name.clone(), name_style),
        Span::raw(format!(" ({})", millis_to_clock(state.map(|s| s.state_time)))),
        Span::styled(" ●", Style::default().fg(light)),
    ])
}

fn player_statline(state: Option<&EntitySnapshot>) -> Line<'static> {
    match state {
        Some(s) => Line::from(format!(
            "    Score {}  Spec {}  Lives {}  Shots {}",
            s.score,
            s.sp_available(),
            s.lives,
            s.shots
        )),
        None => Line::styled("    NO DATA", Style::default().fg(Color::DarkGray)),
    }
}

fn team_color(ui_color: &str) -> Color {
    match ui_color {
        "red" => Color::Red,
        "green" => Color::Green,
        "blue" => Color::Blue,
        "yellow" => Color::Yellow,
        "purple" => Color::Magenta,
        _ => Color::White,
    }
}
