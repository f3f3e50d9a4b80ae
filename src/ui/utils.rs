use ratatui::layout::{Constraint, Flex, Layout, Rect};
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

/// Truncate a string to fit within the given display width, handling Unicode properly
pub fn truncate_by_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for ch in s.chars() {
        let char_width = ch.width().unwrap_or(0);
        if current_width + char_width > max_width {
            break;
        }
        result.push(ch);
        current_width += char_width;
    }

    result
}

/// Short human form of an age: 42s, 5m, 2h
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    match secs {
        0..60 => format!("{}s", secs),
        60..3600 => format!("{}m", secs / 60),
        _ => format!("{}h", secs / 3600),
    }
}

/// Helper function to center a rect within another rect
pub fn center_area(area: Rect, horizontal: Constraint, vertical: Constraint) -> Rect {
    let [area] = Layout::horizontal([horizontal])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([vertical]).flex(Flex::Center).areas(area);
    area
}

pub fn center_image(image_dimensions: Rect, available_area: Rect) -> Rect {
    let width = image_dimensions.width.min(available_area.width);
    let height = image_dimensions.height.min(available_area.height);
    Rect {
        x: available_area.x + (available_area.width - width) / 2,
        y: available_area.y + (available_area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_by_width_counts_wide_chars() {
        assert_eq!(truncate_by_width("malscroll", 4), "mals");
        assert_eq!(truncate_by_width("進撃の巨人", 5), "進撃");
        assert_eq!(truncate_by_width("short", 20), "short");
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::from_secs(42)), "42s");
        assert_eq!(format_age(Duration::from_secs(300)), "5m");
        assert_eq!(format_age(Duration::from_secs(7300)), "2h");
    }

    #[test]
    fn test_center_image_clamps_to_area() {
        let area = Rect::new(0, 0, 80, 20);
        assert_eq!(center_image(Rect::new(0, 0, 40, 10), area), Rect::new(20, 5, 40, 10));
        assert_eq!(center_image(Rect::new(0, 0, 100, 30), area), area);
    }
}
