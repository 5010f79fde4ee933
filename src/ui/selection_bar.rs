use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::truncate_unicode;
use crate::ui::theme::Theme;

#[derive(Debug, Clone)]
pub enum SelectionInfo {
    Process {
        pid: u32,
        name: String,
        mem_percent: f64,
    },
    Connection {
        pid: u32,
        process_name: String,
        remote_ip: String,
        remote_host: String,
    },
}

pub fn render(frame: &mut Frame, area: Rect, selected: Option<SelectionInfo>, theme: &Theme) {
    let style = Style::default()
        .bg(theme.statusbar_bg)
        .fg(theme.text_primary);
    let width = area.width as usize;
    let line = match selected {
        Some(selection) => format_selection_line(selection, width),
        None => " ".repeat(width),
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, style))).style(style),
        area,
    );
}

/// Left part names the row, right part is kept visible when space runs out.
fn format_selection_line(selection: SelectionInfo, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let (left, right) = match selection {
        SelectionInfo::Process {
            pid,
            name,
            mem_percent,
        } => (format!("{pid} {name}"), format!("{mem_percent:.2}% RAM")),
        SelectionInfo::Connection {
            pid,
            process_name,
            remote_ip,
            remote_host,
        } => {
            let right = if remote_host == remote_ip {
                remote_ip
            } else {
                format!("{remote_host} ({remote_ip})")
            };
            (format!("{pid} {process_name}"), right)
        }
    };

    let mut right = right;
    if right.width() > width {
        right = truncate_unicode(&right, width);
        let pad = width.saturating_sub(right.width());
        return format!("{}{}", " ".repeat(pad), right);
    }

    let right_width = right.width();
    let left_capacity = width.saturating_sub(right_width + 1);
    let left = truncate_unicode(&left, left_capacity);
    let gap = width.saturating_sub(left.width() + right_width);
    format!("{left}{}{right}", " ".repeat(gap))
}
