//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Page state (`load`, `toggle`)
//!
//! ```text
//! /api/mod.html?private=1#mod._helper
//!     Private API: shown [Hide Private API]
//!     Sidebar: collapsed [» Show Sidebar]
//!     Body: module sidebar-collapsed
//! ```
//!
//! ## Cookies
//!
//! ```text
//! Cookies
//!     private-hidden=no (path /, expires Sun, 03 Mar 2024 12:00:00 GMT)
//!     sidebar-collapsed=yes (path /, expires Sun, 03 Mar 2024 12:00:00 GMT)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure
//! and do no I/O.

use chrono::{DateTime, Utc};

use crate::cookie::{CookieJar, format_http_date};
use crate::page::Page;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

pub fn format_page_state(page: &Page) -> Vec<String> {
    let mut lines = vec![page.location.relative()];

    let visibility = if page.private_hidden() { "hidden" } else { "shown" };
    match &page.privacy_control {
        Some(control) => lines.push(format!(
            "{}Private API: {} [{}]",
            indent(1),
            visibility,
            control.label
        )),
        None => lines.push(format!("{}Private API: {}", indent(1), visibility)),
    }

    if page.sidebar {
        let state = if page.sidebar_collapsed() { "collapsed" } else { "expanded" };
        match &page.sidebar_control {
            Some(control) => lines.push(format!(
                "{}Sidebar: {} [{} {}]",
                indent(1),
                state,
                control.glyph,
                control.label
            )),
            None => lines.push(format!("{}Sidebar: {}", indent(1), state)),
        }
    } else {
        lines.push(format!("{}Sidebar: none", indent(1)));
    }

    if !page.body.is_empty() {
        lines.push(format!("{}Body: {}", indent(1), page.body));
    }
    lines
}

pub fn format_cookies(jar: &CookieJar, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec!["Cookies".to_string()];
    let mut any = false;
    for cookie in jar.live(now) {
        any = true;
        let expiry = match cookie.expires {
            Some(at) => format!("expires {}", format_http_date(at)),
            None => "session".to_string(),
        };
        lines.push(format!(
            "{}{}={} (path {}, {})",
            indent(1),
            cookie.name,
            cookie.value,
            cookie.path,
            expiry
        ));
    }
    if !any {
        lines.push(format!("{}(none)", indent(1)));
    }
    lines
}

pub fn print_page_state(page: &Page) {
    for line in format_page_state(page) {
        println!("{}", line);
    }
}

pub fn print_cookies(jar: &CookieJar, now: DateTime<Utc>) {
    for line in format_cookies(jar, now) {
        println!("{}", line);
    }
}
