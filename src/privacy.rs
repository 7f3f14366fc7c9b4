//! Show/hide toggle for private API entries.
//!
//! Private entries are rendered into every page and hidden by a body class,
//! `private-hidden`. Which way a page opens is decided from, strongest first:
//!
//! 1. **Query override**: `?private=1` shows private entries for this load
//!    only. The stored preference is neither read nor written.
//! 2. **Stored preference**: `"no"` shows, `"yes"` hides.
//! 3. **Default**: show when the URL fragment targets an anchor inside a
//!    private container (a deep link into private API), hide otherwise. The
//!    default is written to the store on first visit.
//!
//! Note that a stored `"yes"` beats the deep-link default: a reader who hid
//! private API earlier and then follows a link to a private entry lands on a
//! page where that entry is hidden.
//!
//! The body class is the current state; the button label and the address
//! bar are derived from it by [`update`].

use tracing::debug;

use crate::config::ToggleConfig;
use crate::page::{PRIVATE_HIDDEN_CLASS, Page, PageError};
use crate::store::{FlagKey, FlagStore, FlagValue};

/// Page signals read before consulting the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrivacySignals {
    /// The query asks for private entries to be shown.
    pub query_override: bool,
    /// The fragment targets an anchor inside a private container.
    pub private_anchor: bool,
}

impl PrivacySignals {
    pub fn from_page(page: &Page, config: &ToggleConfig) -> Self {
        let query_override = page
            .location
            .show_private_requested(&config.privacy.query_param);
        let private_anchor = page
            .location
            .fragment()
            .is_some_and(|name| page.anchor_in_private_container(name));
        Self {
            query_override,
            private_anchor,
        }
    }
}

/// Where the initial state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    QueryOverride,
    Stored,
    Default,
}

/// Outcome of [`resolve_initial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivacyDecision {
    pub hidden: bool,
    /// Value to write back: set only when no preference was stored yet.
    pub persist: Option<FlagValue>,
    pub source: Source,
}

/// Decide the initial hidden state.
///
/// `stored` is only meaningful without a query override; callers that see
/// one need not read the store at all.
pub fn resolve_initial(signals: &PrivacySignals, stored: Option<FlagValue>) -> PrivacyDecision {
    if signals.query_override {
        return PrivacyDecision {
            hidden: false,
            persist: None,
            source: Source::QueryOverride,
        };
    }
    let default_hidden = !signals.private_anchor;
    match stored {
        Some(value) => PrivacyDecision {
            hidden: value.is_yes(),
            persist: None,
            source: Source::Stored,
        },
        None => PrivacyDecision {
            hidden: default_hidden,
            persist: Some(FlagValue::from_bool(default_hidden)),
            source: Source::Default,
        },
    }
}

/// Resolve and apply the initial state on page load. Returns whether
/// private entries end up hidden.
pub fn init<S: FlagStore>(
    page: &mut Page,
    store: &mut S,
    config: &ToggleConfig,
) -> Result<bool, PageError> {
    page.privacy_control_mut()?;

    let signals = PrivacySignals::from_page(page, config);
    let stored = if signals.query_override {
        None
    } else {
        store.read(FlagKey::PrivateHidden)
    };
    let decision = resolve_initial(&signals, stored);
    debug!(
        query_override = signals.query_override,
        private_anchor = signals.private_anchor,
        stored = ?stored,
        hidden = decision.hidden,
        source = ?decision.source,
        "resolved private API visibility"
    );

    if let Some(value) = decision.persist {
        store.write(FlagKey::PrivateHidden, value, config.cookies.ttl());
    }
    page.body.set(PRIVATE_HIDDEN_CLASS, decision.hidden);
    update(page, config)?;
    Ok(decision.hidden)
}

/// Flip visibility, persist it, refresh label and URL. Returns the new
/// hidden state.
pub fn toggle<S: FlagStore>(
    page: &mut Page,
    store: &mut S,
    config: &ToggleConfig,
) -> Result<bool, PageError> {
    page.privacy_control_mut()?;

    let hidden = page.body.toggle(PRIVATE_HIDDEN_CLASS);
    debug!(hidden, "toggled private API visibility");
    store.write(
        FlagKey::PrivateHidden,
        FlagValue::from_bool(hidden),
        config.cookies.ttl(),
    );
    update(page, config)?;
    Ok(hidden)
}

/// Sync the button label and address bar with the body class.
pub fn update(page: &mut Page, config: &ToggleConfig) -> Result<(), PageError> {
    let hidden = page.private_hidden();
    page.privacy_control_mut()?.label = config.privacy.label(hidden).to_string();
    if hidden {
        page.location.strip_query();
    } else {
        page.location.set_query(&config.privacy.query_marker());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Control, PageLayout};
    use crate::store::{MemoryStore, lifetime};
    use crate::test_helpers::{api_page, memory_store};

    fn signals(query_override: bool, private_anchor: bool) -> PrivacySignals {
        PrivacySignals {
            query_override,
            private_anchor,
        }
    }

    // -------------------------------------------------------------------
    // resolve_initial
    // -------------------------------------------------------------------

    #[test]
    fn query_override_shows_and_skips_store() {
        for stored in [None, Some(FlagValue::Yes), Some(FlagValue::No)] {
            let d = resolve_initial(&signals(true, false), stored);
            assert!(!d.hidden);
            assert_eq!(d.persist, None);
            assert_eq!(d.source, Source::QueryOverride);
        }
    }

    #[test]
    fn first_visit_defaults_to_hidden_and_persists_yes() {
        let d = resolve_initial(&signals(false, false), None);
        assert!(d.hidden);
        assert_eq!(d.persist, Some(FlagValue::Yes));
        assert_eq!(d.source, Source::Default);
    }

    #[test]
    fn first_visit_private_anchor_shows_and_persists_no() {
        let d = resolve_initial(&signals(false, true), None);
        assert!(!d.hidden);
        assert_eq!(d.persist, Some(FlagValue::No));
    }

    #[test]
    fn stored_no_shows() {
        for anchor in [false, true] {
            let d = resolve_initial(&signals(false, anchor), Some(FlagValue::No));
            assert!(!d.hidden);
            assert_eq!(d.persist, None);
            assert_eq!(d.source, Source::Stored);
        }
    }

    #[test]
    fn stored_yes_beats_private_anchor() {
        // A stale "hide" preference suppresses a deep link into private API.
        let d = resolve_initial(&signals(false, true), Some(FlagValue::Yes));
        assert!(d.hidden);
        assert_eq!(d.persist, None);
    }

    // -------------------------------------------------------------------
    // init / toggle / update against a page
    // -------------------------------------------------------------------

    #[test]
    fn init_query_override_leaves_store_untouched() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html?private=1");
        let mut store = memory_store();

        let hidden = init(&mut page, &mut store, &config).unwrap();

        assert!(!hidden);
        assert!(!page.private_hidden());
        assert_eq!(store.read(FlagKey::PrivateHidden), None);
        assert_eq!(store.writes(), 0);
        assert_eq!(page.location.relative(), "/mod.html?private=1");
    }

    #[test]
    fn init_query_override_ignores_stored_yes() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html?private=1");
        let mut store = memory_store().with(FlagKey::PrivateHidden, FlagValue::Yes, lifetime(2));

        assert!(!init(&mut page, &mut store, &config).unwrap());
        assert_eq!(store.read(FlagKey::PrivateHidden), Some(FlagValue::Yes));
    }

    #[test]
    fn init_first_visit_hides_and_writes_yes() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html");
        let mut store = memory_store();

        assert!(init(&mut page, &mut store, &config).unwrap());
        assert!(page.private_hidden());
        assert_eq!(store.read(FlagKey::PrivateHidden), Some(FlagValue::Yes));
        assert_eq!(page.privacy_control.as_ref().unwrap().label, "Show Private API");
    }

    #[test]
    fn init_deep_link_to_private_anchor_shows_and_writes_no() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html#mod._helper");
        let mut store = memory_store();

        assert!(!init(&mut page, &mut store, &config).unwrap());
        assert_eq!(store.read(FlagKey::PrivateHidden), Some(FlagValue::No));
        assert_eq!(page.location.relative(), "/mod.html?private=1#mod._helper");
    }

    #[test]
    fn init_deep_link_to_public_anchor_hides() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html#mod.public_fn");
        let mut store = memory_store();

        assert!(init(&mut page, &mut store, &config).unwrap());
        assert_eq!(page.location.relative(), "/mod.html#mod.public_fn");
    }

    #[test]
    fn init_stale_yes_hides_private_deep_link() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html#mod._helper");
        let mut store = memory_store().with(FlagKey::PrivateHidden, FlagValue::Yes, lifetime(2));

        assert!(init(&mut page, &mut store, &config).unwrap());
        assert!(page.private_hidden());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn init_stored_no_shows() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html");
        let mut store = memory_store().with(FlagKey::PrivateHidden, FlagValue::No, lifetime(2));

        assert!(!init(&mut page, &mut store, &config).unwrap());
        assert_eq!(page.privacy_control.as_ref().unwrap().label, "Hide Private API");
    }

    #[test]
    fn init_clears_stale_body_class() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html");
        page.body.add(PRIVATE_HIDDEN_CLASS);
        let mut store = memory_store().with(FlagKey::PrivateHidden, FlagValue::No, lifetime(2));

        init(&mut page, &mut store, &config).unwrap();
        assert!(!page.private_hidden());
    }

    #[test]
    fn init_is_idempotent() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html#mod._helper");
        let mut store = memory_store();

        init(&mut page, &mut store, &config).unwrap();
        let body = page.body.clone();
        let url = page.location.relative();
        let stored = store.read(FlagKey::PrivateHidden);

        init(&mut page, &mut store, &config).unwrap();
        assert_eq!(page.body, body);
        assert_eq!(page.location.relative(), url);
        assert_eq!(store.read(FlagKey::PrivateHidden), stored);
    }

    #[test]
    fn init_without_control_fails_before_mutating() {
        let config = ToggleConfig::default();
        let layout = PageLayout {
            privacy_control: None,
            ..PageLayout::default()
        };
        let mut page = Page::open(layout, "https://d.test/mod.html").unwrap();
        let mut store = memory_store();

        let err = init(&mut page, &mut store, &config).unwrap_err();
        assert!(matches!(err, PageError::MissingControl(Control::ShowPrivate)));
        assert!(!page.private_hidden());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn toggle_round_trip() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html#frag");
        let mut store = memory_store();
        init(&mut page, &mut store, &config).unwrap();
        let body = page.body.clone();
        let stored = store.read(FlagKey::PrivateHidden);

        assert!(!toggle(&mut page, &mut store, &config).unwrap());
        assert_eq!(store.read(FlagKey::PrivateHidden), Some(FlagValue::No));
        assert_eq!(page.location.relative(), "/mod.html?private=1#frag");
        assert_eq!(page.privacy_control.as_ref().unwrap().label, "Hide Private API");

        assert!(toggle(&mut page, &mut store, &config).unwrap());
        assert_eq!(page.body, body);
        assert_eq!(store.read(FlagKey::PrivateHidden), stored);
        assert_eq!(page.location.relative(), "/mod.html#frag");
        assert_eq!(page.privacy_control.as_ref().unwrap().label, "Show Private API");
    }

    #[test]
    fn toggle_after_query_override_persists() {
        let config = ToggleConfig::default();
        let mut page = api_page("https://d.test/mod.html?private=1");
        let mut store = memory_store();
        init(&mut page, &mut store, &config).unwrap();

        assert!(toggle(&mut page, &mut store, &config).unwrap());
        assert_eq!(store.read(FlagKey::PrivateHidden), Some(FlagValue::Yes));
        assert_eq!(page.location.relative(), "/mod.html");
    }

    #[test]
    fn update_uses_configured_param_and_labels() {
        let mut config = ToggleConfig::default();
        config.privacy.query_param = "showall".into();
        config.privacy.hide_label = "Hide internals".into();
        let mut page = api_page("https://d.test/mod.html?x=1");

        update(&mut page, &config).unwrap();
        assert_eq!(page.location.relative(), "/mod.html?showall=1");
        assert_eq!(page.privacy_control.as_ref().unwrap().label, "Hide internals");
    }

    #[test]
    fn writes_use_configured_lifetime() {
        let mut config = ToggleConfig::default();
        config.cookies.lifetime_days = 1;
        let mut page = api_page("https://d.test/mod.html");
        let mut store: MemoryStore<_> = memory_store();
        init(&mut page, &mut store, &config).unwrap();

        store.clock().advance(chrono::Duration::days(1));
        assert_eq!(store.read(FlagKey::PrivateHidden), None);
    }
}
