//! # apidoc-toggles
//!
//! Persisted UI toggles for generated API documentation pages. Two
//! independent switches live on every page:
//!
//! - **Private API**: show or hide entries marked `private`.
//! - **Sidebar**: expand or collapse the navigation sidebar.
//!
//! Each toggle resolves its state on page load, reflects it as a class on
//! `<body>`, lets the reader flip it, and remembers the choice across pages
//! in a short-lived cookie scoped to the site root.
//!
//! # Page Lifecycle
//!
//! ```text
//! load:   privacy::init  →  sidebar::init          (bootstrap::load)
//! click:  privacy::toggle | sidebar::toggle
//! ```
//!
//! Both initializers write a default to the store the first time a page is
//! seen, so later loads never have to guess. A `?private=1` link is the only
//! way to change state without touching the store.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | `FlagStore` trait, flag keys/values, in-memory store |
//! | [`cookie`] | `document.cookie`-style jar implementing `FlagStore`, JSON persistence |
//! | [`clock`] | Injected time source for expiry |
//! | [`location`] | Address bar: query override, fragment, in-place rewrites |
//! | [`page`] | The page contract: body classes, anchors, controls |
//! | [`privacy`] | Private API toggle: precedence rules, flip, label/URL sync |
//! | [`sidebar`] | Sidebar toggle: stored state, flip, glyph/label sync |
//! | [`bootstrap`] | Runs both initializers once per page load |
//! | [`config`] | `toggles.toml` loading, merging, validation |
//! | [`render`] | Maud rendering of a page's toggle state |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Decide, Then Mutate
//!
//! Each toggle separates a pure decision ([`privacy::resolve_initial`],
//! [`sidebar::resolve_initial`]) from the step that writes the body class,
//! label and store. The precedence rules are tested as plain functions; the
//! page is touched in one place.
//!
//! ## Absent Is a State
//!
//! The store distinguishes "never written" from `"no"`. Absence is what
//! triggers the one-time default write; malformed or expired values fold
//! into absence rather than surfacing as errors.
//!
//! ## Missing Controls Fail Fast
//!
//! A page that claims a toggle but lacks its control is malformed output
//! from the generator. Initializers return [`page::PageError::MissingControl`]
//! before mutating anything instead of silently skipping.

pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod cookie;
pub mod location;
pub mod output;
pub mod page;
pub mod privacy;
pub mod render;
pub mod sidebar;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;
