//! Deterministic word wrap for entry titles.
//!
//! Works on `char`s so multi-byte titles never split inside a code point.

/// Titles are cut to this many characters before wrapping
pub const TITLE_MAX_CHARS: usize = 100;
/// Characters per title line
pub const LINE_WIDTH: usize = 20;
/// Title lines per entry
pub const MAX_LINES: usize = 4;

const ELLIPSIS: &str = "...";

/// Cut `text` to `max_chars`, replacing the last three kept characters with "..."
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

fn trim_left(chars: &[char]) -> &[char] {
    let start = chars.iter().position(|&c| c != ' ').unwrap_or(chars.len());
    &chars[start..]
}

fn trim_right(chars: &[char]) -> &[char] {
    let end = chars.iter().rposition(|&c| c != ' ').map_or(0, |p| p + 1);
    &chars[..end]
}

/// Break `text` into at most `max_lines` lines of at most `max_line` chars.
///
/// Breaks at the last space at or before column `max_line` unless that space
/// sits before half the line width, in which case the word is split at
/// `max_line`. When text remains after the second-to-last line and would not
/// fit on one more line, the last line is cut and ends in "...".
pub fn wrap_lines(text: &str, max_line: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if max_line == 0 || max_lines == 0 {
        return lines;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut rest = trim_left(&chars);

    while !rest.is_empty() && lines.len() < max_lines {
        if rest.len() <= max_line {
            lines.push(rest.iter().collect());
            break;
        }

        let break_pos = match rest[..=max_line].iter().rposition(|&c| c == ' ') {
            Some(pos) if pos >= max_line / 2 => pos,
            _ => max_line,
        };

        lines.push(trim_right(&rest[..break_pos]).iter().collect());
        rest = trim_left(&rest[break_pos..]);

        if lines.len() == max_lines - 1 && rest.len() > max_line {
            let last = &rest[..max_line];
            let last: String = if max_line > ELLIPSIS.len() {
                last[..max_line - ELLIPSIS.len()]
                    .iter()
                    .collect::<String>()
                    + ELLIPSIS
            } else {
                last.iter().collect()
            };
            lines.push(last);
            break;
        }
    }

    lines
}

/// Title lines as drawn under a cover
pub fn wrap_title(title: &str) -> Vec<String> {
    wrap_lines(&truncate(title, TITLE_MAX_CHARS), LINE_WIDTH, MAX_LINES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_title_is_single_line() {
        assert_eq!(wrap_title("Berserk"), vec!["Berserk"]);
        assert_eq!(wrap_title("   One Piece"), vec!["One Piece"]);
        assert_eq!(wrap_title("exactly twenty chars"), vec!["exactly twenty chars"]);
    }

    #[test]
    fn test_empty_title_has_no_lines() {
        assert!(wrap_title("").is_empty());
        assert!(wrap_title("     ").is_empty());
    }

    #[test]
    fn test_breaks_at_last_space() {
        let lines = wrap_title("A very very very very long manga title that needs wrapping badly");
        assert_eq!(
            lines,
            vec![
                "A very very very",
                "very long manga",
                "title that needs",
                "wrapping badly"
            ]
        );
    }

    #[test]
    fn test_forces_break_without_usable_space() {
        assert_eq!(
            wrap_title("abcdefghijklmnopqrstuvwxyz"),
            vec!["abcdefghijklmnopqrst", "uvwxyz"]
        );
        // Space before half the width does not count
        assert_eq!(
            wrap_title("ab cdefghijklmnopqrstuvwxyz"),
            vec!["ab cdefghijklmnopqrs", "tuvwxyz"]
        );
    }

    #[test]
    fn test_fourth_line_gets_ellipsis() {
        let lines = wrap_title(
            "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj kkkk llll mmmm nnnn oooo pppp qqqq",
        );
        assert_eq!(
            lines,
            vec![
                "aaaa bbbb cccc dddd",
                "eeee ffff gggg hhhh",
                "iiii jjjj kkkk llll",
                "mmmm nnnn oooo pp..."
            ]
        );
    }

    #[test]
    fn test_fourth_line_that_fits_is_kept_whole() {
        let lines = wrap_title("aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj kkkk llll mmmm nnnn oooo ppppp");
        assert_eq!(lines[3], "mmmm nnnn oooo ppppp");

        // One more character no longer fits
        let lines = wrap_title("aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj kkkk llll mmmm nnnn oooo pppppp");
        assert_eq!(lines[3], "mmmm nnnn oooo pp...");
        assert_eq!(lines.len(), MAX_LINES);
    }

    #[test]
    fn test_line_limits_hold_for_long_input() {
        let title = "Sono Bisque Doll wa Koi wo Suru: The Extraordinarily Long Subtitle Edition of Something";
        let lines = wrap_title(&title.repeat(3));
        assert!(lines.len() <= MAX_LINES);
        for line in &lines {
            assert!(!line.is_empty());
            assert!(line.chars().count() <= LINE_WIDTH, "line too long: {line:?}");
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 2), "he");
        assert_eq!(truncate(&"x".repeat(120), TITLE_MAX_CHARS).chars().count(), 100);
    }

    #[test]
    fn test_multibyte_titles_do_not_panic() {
        let lines = wrap_title("進撃の巨人進撃の巨人進撃の巨人進撃の巨人進撃の巨人");
        assert_eq!(lines[0].chars().count(), LINE_WIDTH);
    }
}
