//! Formatting helpers shared by the CLI and the countdown display

use std::time::Duration;

/// Format minutes as "Xh Ym", or "Ym" under an hour
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a countdown as "MM:SS". Minutes grow past 59 rather than wrapping.
pub fn format_clock(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format a ratio in [0, 1] as a whole percentage
pub fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Draw a simple bar chart
pub fn draw_bar(value: u64, max: u64, width: usize) -> String {
    let max = max.max(1);
    let filled = (u128::from(value.min(max)) * width as u128 / u128::from(max)) as usize;
    let empty = width - filled;

    format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(90), "1h 30m");
        assert_eq!(format_minutes(120), "2h 0m");
        assert_eq!(format_minutes(u64::from(u32::MAX) + 1), "71582788h 16m");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::from_secs(25 * 60)), "25:00");
        assert_eq!(format_clock(Duration::from_secs(61)), "01:01");
        assert_eq!(format_clock(Duration::from_secs(0)), "00:00");
        assert_eq!(format_clock(Duration::from_secs(90 * 60)), "90:00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(2.0 / 3.0), "67%");
        assert_eq!(format_percent(0.0), "0%");
    }

    #[test]
    fn test_draw_bar() {
        assert_eq!(draw_bar(5, 10, 4).chars().filter(|c| *c == '\u{2588}').count(), 2);
        assert_eq!(draw_bar(0, 0, 3), "\u{2591}\u{2591}\u{2591}");
        assert_eq!(draw_bar(20, 10, 2), "\u{2588}\u{2588}");
        assert_eq!(draw_bar(u64::MAX, u64::MAX, 2), "\u{2588}\u{2588}");
    }
}
