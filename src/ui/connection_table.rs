use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::system::connection::ConnectionEntry;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    rows: &[ConnectionEntry],
    loaded: bool,
    state: &mut TableState,
    focused: bool,
    theme: &Theme,
) {
    let border = if focused {
        theme.focus_border
    } else {
        theme.overlay_border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            " Network Connections ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    if !loaded {
        frame.render_widget(
            Paragraph::new("Collecting connection data...")
                .style(Style::default().fg(theme.text_secondary))
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(["PID", "PROCESS", "LOCAL ADDR", "REMOTE ADDR", "STATUS"])
        .style(Style::default().fg(theme.label).add_modifier(Modifier::BOLD));

    let rows = rows.iter().map(|c| {
        Row::new([
            Cell::from(c.pid.to_string()).style(Style::default().fg(theme.text_primary)),
            Cell::from(c.process_name.clone()).style(Style::default().fg(theme.process_name)),
            Cell::from(c.local_address.clone()).style(Style::default().fg(theme.text_primary)),
            Cell::from(c.remote_address.clone()).style(Style::default().fg(theme.text_primary)),
            Cell::from(c.status.label()).style(Style::default().fg(theme.status_fg)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(18),
            Constraint::Length(24),
            Constraint::Min(24),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(theme.selection_bg).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(table, area, state);
}
