use std::ops::Range;

/// Which character opens a popup and where it may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerConfig {
    pub char: char,
    /// Only trigger when the character is the first thing in the textblock.
    pub start_of_line: bool,
}

impl TriggerConfig {
    pub const fn new(char: char) -> Self {
        Self {
            char,
            start_of_line: false,
        }
    }

    pub const fn start_of_line(mut self) -> Self {
        self.start_of_line = true;
        self
    }
}

/// An active trigger: `range` covers the trigger char plus the query typed after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub range: Range<usize>,
    pub query: String,
}

/// Finds the trigger range ending at `cursor`, scanning backwards through `chars`.
///
/// The query may not contain whitespace, and the trigger char must sit at the
/// start of the textblock or right after whitespace (so `http:/` and `a@b` never trigger).
pub fn find_trigger(chars: &[char], cursor: usize, config: TriggerConfig) -> Option<TriggerMatch> {
    let cursor = cursor.min(chars.len());
    let start = chars[..cursor]
        .iter()
        .rposition(|c| c.is_whitespace() || *c == config.char)?;
    if chars[start] != config.char {
        return None;
    }
    if config.start_of_line && start != 0 {
        return None;
    }
    if start > 0 && !chars[start - 1].is_whitespace() {
        return None;
    }
    Some(TriggerMatch {
        range: start..cursor,
        query: chars[start + 1..cursor].iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    const SLASH: TriggerConfig = TriggerConfig::new('/');

    #[test]
    fn trigger_at_start() {
        let m = find_trigger(&chars("/"), 1, SLASH).unwrap();
        assert_eq!(m.range, 0..1);
        assert_eq!(m.query, "");
    }

    #[test]
    fn trigger_with_query() {
        let m = find_trigger(&chars("text /head"), 10, SLASH).unwrap();
        assert_eq!(m.range, 5..10);
        assert_eq!(m.query, "head");
    }

    #[test]
    fn trigger_after_newline() {
        let m = find_trigger(&chars("line\n/"), 6, SLASH).unwrap();
        assert_eq!(m.range, 5..6);
    }

    #[test]
    fn no_trigger_mid_word() {
        assert_eq!(find_trigger(&chars("http:/"), 6, SLASH), None);
        assert_eq!(find_trigger(&chars("path/to"), 7, SLASH), None);
    }

    #[test]
    fn whitespace_ends_the_query() {
        assert_eq!(find_trigger(&chars("/head ing"), 9, SLASH), None);
    }

    #[test]
    fn cursor_before_trigger_does_not_match() {
        assert_eq!(find_trigger(&chars("ab /x"), 2, SLASH), None);
    }

    #[test]
    fn mention_trigger_ignores_emails() {
        let at = TriggerConfig::new('@');
        assert_eq!(find_trigger(&chars("mail a@b"), 8, at), None);
        let m = find_trigger(&chars("hi @an"), 6, at).unwrap();
        assert_eq!(m.query, "an");
    }

    #[test]
    fn start_of_line_only_matches_at_zero() {
        let config = SLASH.start_of_line();
        assert!(find_trigger(&chars("/h"), 2, config).is_some());
        assert_eq!(find_trigger(&chars("a /h"), 4, config), None);
    }

    #[test]
    fn cursor_past_end_is_clamped() {
        let m = find_trigger(&chars("/x"), 10, SLASH).unwrap();
        assert_eq!(m.range, 0..2);
    }
}
