use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_gib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / GIB)
}

pub fn format_rate(kbps: f64) -> String {
    format!("{kbps:7.2} KB/s")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate_unicode("kworker/u16:3", 6), "kwork\u{2026}");
        assert_eq!(truncate_unicode("sshd", 6), "sshd");
    }

    #[test]
    fn gib_has_two_decimals() {
        assert_eq!(format_gib(8 * 1024 * 1024 * 1024), "8.00");
        assert_eq!(format_gib(1536 * 1024 * 1024), "1.50");
    }

    #[test]
    fn rate_is_padded() {
        assert_eq!(format_rate(1.0), "   1.00 KB/s");
        assert_eq!(format_rate(-0.5), "  -0.50 KB/s");
    }
}
