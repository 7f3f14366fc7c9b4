//! Shared test utilities for the apidoc-toggles test suite.
//!
//! Provides a fixed point in time, a clocked in-memory store, and a small
//! module page with one public and one private documented function.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut page = api_page("https://d.test/mod.html#mod._helper");
//! let mut store = memory_store();
//! privacy::init(&mut page, &mut store, &ToggleConfig::default()).unwrap();
//! assert!(!page.private_hidden());
//! ```

use chrono::{DateTime, TimeZone, Utc};

use crate::clock::FixedClock;
use crate::page::{Anchor, ClassList, Page, PageLayout};
use crate::store::MemoryStore;

/// Friday, 1 March 2024, 12:00 UTC.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

/// An empty store on a clock frozen at [`epoch`].
pub fn memory_store() -> MemoryStore<FixedClock> {
    MemoryStore::new(FixedClock::at(epoch()))
}

pub fn private_anchor(name: &str) -> Anchor {
    Anchor {
        name: name.to_string(),
        container_classes: ClassList::from(vec!["private".to_string(), "function".to_string()]),
    }
}

pub fn public_anchor(name: &str) -> Anchor {
    Anchor {
        name: name.to_string(),
        container_classes: ClassList::from(vec!["function".to_string()]),
    }
}

/// Module page documenting `mod.public_fn` and the private `mod._helper`.
pub fn api_layout() -> PageLayout {
    PageLayout {
        title: "mod".to_string(),
        body_classes: ClassList::from(vec!["module".to_string()]),
        anchors: vec![public_anchor("mod.public_fn"), private_anchor("mod._helper")],
        ..PageLayout::default()
    }
}

/// [`api_layout`] opened at `url`. Panics on an invalid URL.
pub fn api_page(url: &str) -> Page {
    Page::open(api_layout(), url).unwrap_or_else(|e| panic!("bad test url {url:?}: {e}"))
}
