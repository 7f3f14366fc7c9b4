//! The page's address bar.
//!
//! Privacy state is mirrored into the URL so a link copied from the address
//! bar reopens the page the way it was being read. [`Location`] exposes the
//! two inputs the privacy initializer reads (the `?private=` override and
//! the `#fragment`) and the two in-place rewrites the updater performs.
//! Rewrites replace the current history entry; nothing navigates.

use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(raw)?,
        })
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Anchor name without the leading `#`. An empty fragment is `None`.
    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment().filter(|f| !f.is_empty())
    }

    /// Whether the query asks for private entries to be shown.
    ///
    /// Only the first occurrence of `param` counts. Its value must start with
    /// a non-zero integer: `1`, `2`, ` 1`, `1abc` are truthy, `0`, `yes` and
    /// an empty value are not.
    pub fn show_private_requested(&self, param: &str) -> bool {
        self.url
            .query_pairs()
            .find(|(k, _)| k == param)
            .and_then(|(_, v)| parse_int_prefix(&v))
            .is_some_and(|n| n != 0)
    }

    /// Drop the query entirely, keeping path and fragment.
    pub fn strip_query(&mut self) {
        self.url.set_query(None);
    }

    /// Replace the query with `marker`, keeping path and fragment.
    pub fn set_query(&mut self, marker: &str) {
        self.url.set_query(Some(marker));
    }

    /// What the address bar shows: path, query and fragment, no origin.
    pub fn relative(&self) -> String {
        let mut out = self.url.path().to_string();
        if let Some(q) = self.url.query() {
            out.push('?');
            out.push_str(q);
        }
        if let Some(f) = self.url.fragment() {
            out.push('#');
            out.push_str(f);
        }
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Leading-integer parse: optional whitespace, optional sign, then digits.
/// Trailing garbage is ignored; no digits at all is `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value = rest[..digits].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(raw: &str) -> Location {
        Location::parse(raw).unwrap()
    }

    #[test]
    fn parse_int_prefix_cases() {
        assert_eq!(parse_int_prefix("1"), Some(1));
        assert_eq!(parse_int_prefix("  42"), Some(42));
        assert_eq!(parse_int_prefix("1abc"), Some(1));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("0"), Some(0));
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("yes"), None);
        assert_eq!(parse_int_prefix("-"), None);
    }

    #[test]
    fn parse_int_prefix_overflow_saturates() {
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn show_private_truthy_values() {
        assert!(loc("https://d.test/a.html?private=1").show_private_requested("private"));
        assert!(loc("https://d.test/a.html?private=2").show_private_requested("private"));
        assert!(loc("https://d.test/a.html?x=0&private=1abc").show_private_requested("private"));
    }

    #[test]
    fn show_private_falsy_values() {
        assert!(!loc("https://d.test/a.html").show_private_requested("private"));
        assert!(!loc("https://d.test/a.html?private=0").show_private_requested("private"));
        assert!(!loc("https://d.test/a.html?private=").show_private_requested("private"));
        assert!(!loc("https://d.test/a.html?private=yes").show_private_requested("private"));
        assert!(!loc("https://d.test/a.html?privateX=1").show_private_requested("private"));
    }

    #[test]
    fn first_occurrence_wins() {
        let l = loc("https://d.test/a.html?private=0&private=1");
        assert!(!l.show_private_requested("private"));
    }

    #[test]
    fn custom_param_name() {
        assert!(loc("https://d.test/a.html?showall=1").show_private_requested("showall"));
    }

    #[test]
    fn fragment_empty_is_none() {
        assert_eq!(loc("https://d.test/a.html#").fragment(), None);
        assert_eq!(loc("https://d.test/a.html").fragment(), None);
        assert_eq!(loc("https://d.test/a.html#mod.Cls").fragment(), Some("mod.Cls"));
    }

    #[test]
    fn strip_query_keeps_fragment() {
        let mut l = loc("https://d.test/api/a.html?private=1#mod._helper");
        l.strip_query();
        assert_eq!(l.relative(), "/api/a.html#mod._helper");
        assert_eq!(l.query(), None);
    }

    #[test]
    fn set_query_replaces_and_keeps_fragment() {
        let mut l = loc("https://d.test/api/a.html?foo=bar#frag");
        l.set_query("private=1");
        assert_eq!(l.relative(), "/api/a.html?private=1#frag");
        assert_eq!(l.to_string(), "https://d.test/api/a.html?private=1#frag");
    }

    #[test]
    fn invalid_url_is_error() {
        assert!(Location::parse("not a url").is_err());
    }
}
