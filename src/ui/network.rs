use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::format_rate;
use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Network I/O ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let label = Style::default().fg(theme.label);
    let value = Style::default().fg(theme.text_primary);
    let line = match snapshot {
        Some(s) => Line::from(vec![
            Span::styled("Download: ", label),
            Span::styled(format_rate(s.download_rate_kbps), value),
            Span::styled("   |   ", Style::default().fg(theme.text_secondary)),
            Span::styled("Upload: ", label),
            Span::styled(format_rate(s.upload_rate_kbps), value),
            Span::styled("   |   ", Style::default().fg(theme.text_secondary)),
            Span::styled(s.timestamp.format("%H:%M:%S").to_string(), value),
        ]),
        None => Line::from(Span::styled(
            "Collecting network data...",
            Style::default().fg(theme.text_secondary),
        )),
    };

    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center).block(block),
        area,
    );
}
