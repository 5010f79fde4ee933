use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::format_gib;
use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_system_info(frame, chunks[0], snapshot, theme);

    let cpu = snapshot.map(|s| s.cpu_usage_percent).unwrap_or(0.0);
    render_gauge(frame, chunks[1], " CPU ", cpu, theme);

    let ram = snapshot.map(|s| s.memory_used_percent).unwrap_or(0.0);
    render_gauge(frame, chunks[2], " RAM ", ram, theme);
}

fn bordered<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_system_info(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, theme: &Theme) {
    let block = bordered(" System Info ", theme);
    let label = Style::default().fg(theme.label);
    let value = Style::default().fg(theme.text_primary);

    let lines = match snapshot {
        Some(s) => vec![
            Line::from(vec![
                Span::styled("CPU Usage: ", label),
                Span::styled(format!("{:5.2}%", s.cpu_usage_percent), value),
                Span::styled("   RAM (Used/Total): ", label),
                Span::styled(
                    format!(
                        "{}/{} GiB ({:5.2}%)",
                        format_gib(s.memory_used),
                        format_gib(s.memory_total),
                        s.memory_used_percent
                    ),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("Available: ", label),
                Span::styled(format!("{} GiB", format_gib(s.memory_available)), value),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "Collecting system data...",
            Style::default().fg(theme.text_secondary),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_gauge(frame: &mut Frame, area: Rect, title: &str, percent: f64, theme: &Theme) {
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .block(bordered(title, theme))
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(if ratio.is_finite() { ratio } else { 0.0 })
        .label(format!("{percent:.0}%"));

    frame.render_widget(gauge, area);
}
