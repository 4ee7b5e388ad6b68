use super::View;
use crate::app::AppCommand;
use crate::replay::ReplayReader;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use std::path::PathBuf;
use std::time::Duration;

pub struct ReplaySelectorState {
    replay_files: Vec<PathBuf>,
    selected_index: usize,
}

impl ReplaySelectorState {
    pub fn new(replay_dir: PathBuf) -> Result<Self> {
        let replay_files = ReplayReader::list_replays(&replay_dir)?;
        Ok(Self {
            replay_files,
            selected_index: 0,
        })
    }

    fn move_selection_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    fn move_selection_down(&mut self) {
        if self.selected_index < self.replay_files.len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }
}

impl View for ReplaySelectorState {
    fn handle_input(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::Quit),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection_down();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection_up();
                None
            }
            KeyCode::Enter => {
                if self.selected_index < self.replay_files.len() {
                    let path = self.replay_files[self.selected_index].clone();
                    Some(AppCommand::OpenReplay(path))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn update(&mut self, _dt: Duration) {}

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("LFStats Replay Viewer")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = if self.replay_files.is_empty() {
            vec![ListItem::new("No replay files found")]
        } else {
            self.replay_files
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    let style = if i == self.selected_index {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    ListItem::new(Line::styled(name, style))
                })
                .collect()
        };

        let list = List::new(items).block(
            Block::default()
                .title(format!("Games ({})", self.replay_files.len()))
                .borders(Borders::ALL),
        );
        frame.render_widget(list, chunks[1]);

        let controls = Paragraph::new("j/k: Select | Enter: Open | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(controls, chunks[2]);
    }
}
