pub mod connection_table;
pub mod header;
pub mod help;
pub mod network;
pub mod process_table;
pub mod selection_bar;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, Focus};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    network::render(frame, chunks[0], app.snapshot.as_ref(), &app.theme);
    header::render(frame, chunks[1], app.snapshot.as_ref(), &app.theme);

    let content_area = chunks[2];
    if app.show_connections {
        let tables = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(content_area);
        render_processes(frame, tables[0], app);
        render_connections(frame, tables[1], app);
    } else {
        render_processes(frame, content_area, app);
    }

    let selected = match app.focus {
        Focus::Processes => app.selected_process().map(|p| selection_bar::SelectionInfo::Process {
            pid: p.pid,
            name: p.name.clone(),
            mem_percent: p.mem_percent,
        }),
        Focus::Connections => app.selected_connection().map(|c| {
            selection_bar::SelectionInfo::Connection {
                pid: c.pid,
                process_name: c.process_name.clone(),
                remote_ip: c.remote_ip.to_string(),
                remote_host: app.dns.lookup(c.remote_ip),
            }
        }),
    };
    selection_bar::render(frame, chunks[3], selected, &app.theme);

    statusbar::render(
        frame,
        chunks[4],
        app.status_message.as_ref(),
        &app.theme,
        app.show_connections,
    );

    // Help overlay goes last so it draws on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}

fn render_processes(frame: &mut Frame, area: ratatui::layout::Rect, app: &mut App) {
    let focused = app.focus == Focus::Processes;
    let rows = app.visible_processes().to_vec();
    let (total_cpu, system_cpu, memory_total) = app
        .snapshot
        .as_ref()
        .map(|s| (s.total_process_cpu, s.cpu_usage_percent, s.memory_total))
        .unwrap_or_default();
    process_table::render(
        frame,
        area,
        process_table::ProcessTableData {
            rows: &rows,
            total_process_cpu: total_cpu,
            system_cpu,
            memory_total,
            loaded: app.snapshot.is_some(),
        },
        &mut app.process_state,
        focused,
        &app.theme,
    );
}

fn render_connections(frame: &mut Frame, area: ratatui::layout::Rect, app: &mut App) {
    let focused = app.focus == Focus::Connections;
    let rows = app.visible_connections().to_vec();
    connection_table::render(
        frame,
        area,
        &rows,
        app.snapshot.is_some(),
        &mut app.connection_state,
        focused,
        &app.theme,
    );
}
