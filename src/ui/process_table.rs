use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::system::process::ProcessEntry;
use crate::ui::theme::Theme;

pub struct ProcessTableData<'a> {
    pub rows: &'a [ProcessEntry],
    pub total_process_cpu: f64,
    pub system_cpu: f64,
    pub memory_total: u64,
    pub loaded: bool,
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    data: ProcessTableData<'_>,
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
            " Top Processes (RAM) ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    if !data.loaded {
        frame.render_widget(
            Paragraph::new("Collecting process data...")
                .style(Style::default().fg(theme.text_secondary))
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(["PID", "NAME", "CPU (%)", "RAM (%) / MB"])
        .style(Style::default().fg(theme.label).add_modifier(Modifier::BOLD));

    let rows = data.rows.iter().map(|p| {
        let relative_cpu = p.relative_cpu(data.total_process_cpu, data.system_cpu);
        Row::new([
            Cell::from(p.pid.to_string()).style(Style::default().fg(theme.text_primary)),
            Cell::from(p.name.clone()).style(Style::default().fg(theme.process_name)),
            Cell::from(format!("{relative_cpu:.2}")).style(Style::default().fg(theme.text_primary)),
            Cell::from(format!(
                "{:.2}% / {:.2}MB",
                p.mem_percent,
                p.memory_mib(data.memory_total)
            ))
            .style(Style::default().fg(theme.text_primary)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(16),
            Constraint::Length(9),
            Constraint::Length(22),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(theme.selection_bg).add_modifier(Modifier::BOLD));

    frame.render_stateful_widget(table, area, state);
}
