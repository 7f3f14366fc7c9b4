//! Page-load entry point.
//!
//! Runs the privacy initializer, then the sidebar initializer, once per
//! load. The two are independent; the order only fixes which one fails
//! first on a malformed page. Pages generated without a sidebar skip the
//! sidebar initializer instead of failing on its missing control.

use tracing::{debug, info_span};

use crate::config::ToggleConfig;
use crate::page::{Page, PageError};
use crate::store::FlagStore;
use crate::{privacy, sidebar};

/// State a page load settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub private_hidden: bool,
    /// `None` when the page has no sidebar.
    pub sidebar_collapsed: Option<bool>,
}

pub fn load<S: FlagStore>(
    page: &mut Page,
    store: &mut S,
    config: &ToggleConfig,
) -> Result<LoadReport, PageError> {
    let _span = info_span!("page_load", url = %page.location).entered();

    let private_hidden = privacy::init(page, store, config)?;
    let sidebar_collapsed = if page.sidebar {
        Some(sidebar::init(page, store, config)?)
    } else {
        debug!("page has no sidebar, skipping sidebar toggle");
        None
    };

    Ok(LoadReport {
        private_hidden,
        sidebar_collapsed,
    })
}
