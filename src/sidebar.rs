//! Collapse toggle for the navigation sidebar.
//!
//! Simpler than the privacy toggle: the stored `sidebar-collapsed` value is
//! the only input, and the state never appears in the URL.

use tracing::debug;

use crate::config::ToggleConfig;
use crate::page::{Page, PageError, SIDEBAR_COLLAPSED_CLASS};
use crate::store::{FlagKey, FlagStore, FlagValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarDecision {
    pub collapsed: bool,
    /// Written on first visit to make the expanded default explicit.
    pub persist: Option<FlagValue>,
}

pub fn resolve_initial(stored: Option<FlagValue>) -> SidebarDecision {
    match stored {
        Some(value) => SidebarDecision {
            collapsed: value.is_yes(),
            persist: None,
        },
        None => SidebarDecision {
            collapsed: false,
            persist: Some(FlagValue::No),
        },
    }
}

/// Apply the stored state on page load. Returns whether the sidebar is collapsed.
pub fn init<S: FlagStore>(
    page: &mut Page,
    store: &mut S,
    config: &ToggleConfig,
) -> Result<bool, PageError> {
    page.sidebar_control_mut()?;

    let stored = store.read(FlagKey::SidebarCollapsed);
    let decision = resolve_initial(stored);
    debug!(stored = ?stored, collapsed = decision.collapsed, "resolved sidebar state");

    if let Some(value) = decision.persist {
        store.write(FlagKey::SidebarCollapsed, value, config.cookies.ttl());
    }
    page.body.set(SIDEBAR_COLLAPSED_CLASS, decision.collapsed);
    update(page, config)?;
    Ok(decision.collapsed)
}

/// Collapse or expand, persist, refresh the control. Returns the new state.
pub fn toggle<S: FlagStore>(
    page: &mut Page,
    store: &mut S,
    config: &ToggleConfig,
) -> Result<bool, PageError> {
    page.sidebar_control_mut()?;

    let collapsed = page.body.toggle(SIDEBAR_COLLAPSED_CLASS);
    debug!(collapsed, "toggled sidebar");
    store.write(
        FlagKey::SidebarCollapsed,
        FlagValue::from_bool(collapsed),
        config.cookies.ttl(),
    );
    update(page, config)?;
    Ok(collapsed)
}

/// Sync the arrow glyph and label with the body class.
pub fn update(page: &mut Page, config: &ToggleConfig) -> Result<(), PageError> {
    let collapsed = page.sidebar_collapsed();
    let control = page.sidebar_control_mut()?;
    control.glyph = config.sidebar.glyph(collapsed).to_string();
    control.label = config.sidebar.label(collapsed).to_string();
    Ok(())
}
