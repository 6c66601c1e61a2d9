use chrono::{DateTime, Local, NaiveDate, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a date as "M/D/YYYY"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Format a timestamp as "Mon D, YYYY" in local time
pub fn format_short(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

/// "1 result" / "3 results"
pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Cut `s` to at most `width` terminal columns, ending in "…" when shortened.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_have_no_padding() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(d), "3/7/2024");
    }

    #[test]
    fn truncate_counts_columns() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("你好世界", 5), "你好…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn plural_words() {
        assert_eq!(plural(1, "result"), "1 result");
        assert_eq!(plural(0, "result"), "0 results");
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(1, 2, 4), "██░░");
        assert_eq!(progress_bar(0, 0, 3), "░░░");
    }
}
