//! The slice of a generated documentation page the toggles touch.
//!
//! The documentation generator owns the page; the toggles only assume a
//! small contract from it:
//!
//! - a `<body>` whose class list carries the two state classes;
//! - named anchors (`<a name="...">`) for documented objects, each sitting
//!   in a container that carries `private` when the object is private;
//! - a `#showPrivate` container holding the privacy button;
//! - a `#collapseSideBar` container holding the collapse link and its label,
//!   present only when the page was generated with a sidebar.
//!
//! A [`Page`] is that contract as data: a [`PageLayout`] (loaded from JSON
//! describing the generated page) plus the [`Location`] it was opened at.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::location::Location;

/// Class on the container of an anchor that documents a private object.
pub const PRIVATE_CLASS: &str = "private";
/// Body class present while private entries are hidden.
pub const PRIVATE_HIDDEN_CLASS: &str = "private-hidden";
/// Body class present while the sidebar is collapsed.
pub const SIDEBAR_COLLAPSED_CLASS: &str = "sidebar-collapsed";
/// Body class of pages generated without a sidebar.
pub const NO_SIDEBAR_CLASS: &str = "nosidebar";

#[derive(Error, Debug)]
pub enum PageError {
    #[error("page has no {0} control")]
    MissingControl(Control),
    #[error("invalid page URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("page layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The clickable controls the toggles rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ShowPrivate,
    CollapseSidebar,
}

impl Control {
    /// Id of the element wrapping the control.
    pub fn container_id(self) -> &'static str {
        match self {
            Control::ShowPrivate => "showPrivate",
            Control::CollapseSidebar => "collapseSideBar",
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.container_id())
    }
}

/// An element class list. Keeps insertion order, never holds duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ClassList(Vec<String>);

impl ClassList {
    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }

    pub fn add(&mut self, class: &str) {
        if !self.contains(class) {
            self.0.push(class.to_string());
        }
    }

    pub fn remove(&mut self, class: &str) {
        self.0.retain(|c| c != class);
    }

    /// Add when `on`, remove otherwise.
    pub fn set(&mut self, class: &str, on: bool) {
        if on { self.add(class) } else { self.remove(class) }
    }

    /// Flip `class`; returns whether it is now present.
    pub fn toggle(&mut self, class: &str) -> bool {
        let on = !self.contains(class);
        self.set(class, on);
        on
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for ClassList {
    fn from(classes: Vec<String>) -> Self {
        let mut list = ClassList::default();
        for class in classes.iter().flat_map(|c| c.split_whitespace()) {
            list.add(class);
        }
        list
    }
}

impl From<ClassList> for Vec<String> {
    fn from(list: ClassList) -> Self {
        list.0
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// A named anchor and the classes of its nearest enclosing container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    #[serde(default)]
    pub container_classes: ClassList,
}

impl Anchor {
    pub fn is_private(&self) -> bool {
        self.container_classes.contains(PRIVATE_CLASS)
    }
}

/// `#showPrivate button`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyControl {
    #[serde(default)]
    pub label: String,
}

/// `#collapseSideBar`: the arrow link and the label next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebarControl {
    #[serde(default)]
    pub glyph: String,
    #[serde(default)]
    pub label: String,
}

/// Static description of a generated page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageLayout {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body_classes: ClassList,
    /// False when the generator ran without a sidebar.
    #[serde(default = "default_true")]
    pub sidebar: bool,
    #[serde(default)]
    pub anchors: Vec<Anchor>,
    #[serde(default)]
    pub privacy_control: Option<PrivacyControl>,
    #[serde(default)]
    pub sidebar_control: Option<SidebarControl>,
}

fn default_true() -> bool {
    true
}

impl Default for PageLayout {
    /// A page with both controls and no anchors.
    fn default() -> Self {
        Self {
            title: String::new(),
            body_classes: ClassList::default(),
            sidebar: true,
            anchors: Vec::new(),
            privacy_control: Some(PrivacyControl::default()),
            sidebar_control: Some(SidebarControl::default()),
        }
    }
}

impl PageLayout {
    pub fn load(path: &Path) -> Result<Self, PageError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A page as currently displayed: its mutable DOM state plus address bar.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub body: ClassList,
    pub sidebar: bool,
    pub anchors: Vec<Anchor>,
    pub privacy_control: Option<PrivacyControl>,
    pub sidebar_control: Option<SidebarControl>,
    pub location: Location,
}

impl Page {
    pub fn new(layout: PageLayout, location: Location) -> Self {
        let mut body = layout.body_classes;
        if !layout.sidebar {
            body.add(NO_SIDEBAR_CLASS);
        }
        Self {
            title: layout.title,
            body,
            sidebar: layout.sidebar,
            anchors: layout.anchors,
            privacy_control: layout.privacy_control,
            sidebar_control: layout.sidebar_control,
            location,
        }
    }

    /// Open `layout` at `url`.
    pub fn open(layout: PageLayout, url: &str) -> Result<Self, PageError> {
        Ok(Self::new(layout, Location::parse(url)?))
    }

    /// First anchor with this name, like `querySelector('a[name=...]')`.
    pub fn anchor(&self, name: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.name == name)
    }

    /// Whether `name` resolves to an anchor inside a private container.
    pub fn anchor_in_private_container(&self, name: &str) -> bool {
        self.anchor(name).is_some_and(Anchor::is_private)
    }

    pub fn private_hidden(&self) -> bool {
        self.body.contains(PRIVATE_HIDDEN_CLASS)
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.body.contains(SIDEBAR_COLLAPSED_CLASS)
    }

    pub fn privacy_control_mut(&mut self) -> Result<&mut PrivacyControl, PageError> {
        self.privacy_control
            .as_mut()
            .ok_or(PageError::MissingControl(Control::ShowPrivate))
    }

    pub fn sidebar_control_mut(&mut self) -> Result<&mut SidebarControl, PageError> {
        self.sidebar_control
            .as_mut()
            .ok_or(PageError::MissingControl(Control::CollapseSidebar))
    }
}
