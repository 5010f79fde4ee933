use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

use crate::action::{Action, Direction};
use crate::config::{ActionsConfig, Config, parse_key};
use crate::system::connection::{CONNECTION_DISPLAY_LIMIT, ConnectionEntry};
use crate::system::dns::DnsCache;
use crate::system::launch::{LaunchResult, spawn_detached};
use crate::system::process::ProcessEntry;
use crate::system::snapshot::Snapshot;
use crate::ui::theme::{Theme, resolve_color_support};

const PAGE_ROWS: usize = 10;
const STATUS_TTL_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Processes,
    Connections,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub help: KeyCode,
    pub switch_focus: KeyCode,
    pub open: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            switch_focus: parse_key(&kb.switch_focus).unwrap_or(KeyCode::Tab),
            open: parse_key(&kb.open).unwrap_or(KeyCode::Enter),
        }
    }

    /// Returns (key_label, description) pairs for the help overlay.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.switch_focus), "Switch table"),
            (key_label(self.open), "Open selected row"),
            (key_label(self.help), "Toggle help"),
            ("↑↓".to_string(), "Move selection"),
            ("PgUp/PgDn".to_string(), "Page"),
            ("Home/End".to_string(), "First / last row"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }
}

pub fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        _ => "?".to_string(),
    }
}

/// Render state. Lives on the UI task only; snapshots reach it through
/// [`App::apply_snapshot`].
pub struct App {
    pub running: bool,
    pub snapshot: Option<Snapshot>,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub process_state: TableState,
    pub connection_state: TableState,
    pub process_limit: usize,
    pub show_connections: bool,
    pub theme: Theme,
    pub keybinds: ResolvedKeybinds,
    pub status_message: Option<(String, Instant)>,
    pub dns: DnsCache,
    actions: ActionsConfig,
}

impl App {
    pub fn new(config: Config, dns: DnsCache) -> Self {
        let color_support = resolve_color_support(&config.colors.color_support);
        let theme = Theme::from_config(&config.colors.theme, color_support);
        let keybinds = ResolvedKeybinds::from_config(&config.keybinds);

        App {
            running: true,
            snapshot: None,
            input_mode: InputMode::Normal,
            focus: Focus::Processes,
            process_state: TableState::default(),
            connection_state: TableState::default(),
            process_limit: config.general.process_limit,
            show_connections: config.general.show_connections,
            theme,
            keybinds,
            status_message: None,
            dns,
            actions: config.actions,
        }
    }

    /// Replaces the rendered data with `snapshot`, keeping selections in range.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        let process_rows = self.visible_processes().len();
        let connection_rows = self.visible_connections().len();
        clamp_selection(&mut self.process_state, process_rows);
        clamp_selection(&mut self.connection_state, connection_rows);

        if let Some((_, created)) = &self.status_message
            && created.elapsed().as_secs() >= STATUS_TTL_SECS
        {
            self.status_message = None;
        }
    }

    /// Sorted processes truncated to the configured limit.
    pub fn visible_processes(&self) -> &[ProcessEntry] {
        match &self.snapshot {
            Some(s) => &s.processes[..s.processes.len().min(self.process_limit)],
            None => &[],
        }
    }

    pub fn visible_connections(&self) -> &[ConnectionEntry] {
        if !self.show_connections {
            return &[];
        }
        match &self.snapshot {
            Some(s) => &s.connections[..s.connections.len().min(CONNECTION_DISPLAY_LIMIT)],
            None => &[],
        }
    }

    pub fn selected_process(&self) -> Option<&ProcessEntry> {
        self.process_state
            .selected()
            .and_then(|i| self.visible_processes().get(i))
    }

    pub fn selected_connection(&self) -> Option<&ConnectionEntry> {
        self.connection_state
            .selected()
            .and_then(|i| self.visible_connections().get(i))
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Top),
            KeyCode::End => return Action::Navigate(Direction::Bottom),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.switch_focus {
            return Action::SwitchFocus;
        }
        if code == kb.open {
            return match self.focus {
                Focus::Processes => self
                    .selected_process()
                    .map(|p| Action::OpenProcess(p.pid))
                    .unwrap_or(Action::None),
                Focus::Connections => self
                    .selected_connection()
                    .map(|c| Action::OpenConnection(c.remote_address.clone()))
                    .unwrap_or(Action::None),
            };
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        if key.code == self.keybinds.help || key.code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::SwitchFocus => {
                self.focus = match self.focus {
                    Focus::Processes if self.show_connections => Focus::Connections,
                    _ => Focus::Processes,
                };
            }
            Action::OpenProcess(pid) => {
                let result = spawn_detached(&self.actions.process_command, "{pid}", &pid.to_string());
                self.set_launch_status(result, "process_command");
            }
            Action::OpenConnection(addr) => {
                let result = spawn_detached(&self.actions.connection_command, "{addr}", &addr);
                self.set_launch_status(result, "connection_command");
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::None => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let (state, rows) = match self.focus {
            Focus::Processes => {
                let rows = self.visible_processes().len();
                (&mut self.process_state, rows)
            }
            Focus::Connections => {
                let rows = self.visible_connections().len();
                (&mut self.connection_state, rows)
            }
        };
        if rows == 0 {
            state.select(None);
            return;
        }

        let last = rows - 1;
        let current = state.selected().unwrap_or(0).min(last);
        let next = match direction {
            Direction::Up => current.saturating_sub(1),
            Direction::Down => (current + 1).min(last),
            Direction::PageUp => current.saturating_sub(PAGE_ROWS),
            Direction::PageDown => (current + PAGE_ROWS).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
        state.select(Some(next));
    }

    fn set_launch_status(&mut self, result: LaunchResult, setting: &str) {
        let msg = match result {
            LaunchResult::Spawned { program, .. } => format!("Launched {program}"),
            LaunchResult::Failed(err) => err,
            LaunchResult::NotConfigured => format!("No [actions] {setting} configured"),
        };
        self.status_message = Some((msg, Instant::now()));
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }
}

fn clamp_selection(state: &mut TableState, rows: usize) {
    match state.selected() {
        _ if rows == 0 => state.select(None),
        Some(i) if i >= rows => state.select(Some(rows - 1)),
        None => state.select(Some(0)),
        Some(_) => {}
    }
}
