use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Clear, Row, Table};

use crate::ui::theme::Theme;

const KEY_COLUMN_WIDTH: u16 = 12;

/// Key bindings overlay, centered over `area`.
pub fn render(frame: &mut Frame, area: Rect, entries: &[(String, &str)], theme: &Theme) {
    let width = 44u16.min(area.width.saturating_sub(4));
    let height = (entries.len() as u16 + 2).min(area.height.saturating_sub(2));
    let [overlay] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [overlay] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(overlay);

    let key_style = Style::default()
        .fg(theme.pill_key_fg)
        .bg(theme.pill_key_bg)
        .add_modifier(Modifier::BOLD);
    let rows = entries.iter().map(|(key, desc)| {
        Row::new(vec![
            Cell::from(format!("{key:>width$} ", width = KEY_COLUMN_WIDTH as usize - 1))
                .style(key_style),
            Cell::from(*desc).style(Style::default().fg(theme.pill_desc_fg)),
        ])
    });

    let table = Table::new(
        rows,
        [Constraint::Length(KEY_COLUMN_WIDTH), Constraint::Min(1)],
    )
    .column_spacing(2)
    .style(Style::default().bg(theme.surface_bg))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.focus_border))
            .title(Span::styled(
                " Keys ",
                Style::default().fg(theme.label).add_modifier(Modifier::BOLD),
            )),
    );

    frame.render_widget(Clear, overlay);
    frame.render_widget(table, overlay);
}
