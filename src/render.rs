//! HTML snapshot of a page's toggle state.
//!
//! Renders the parts of a [`Page`] the toggles own (body classes, the
//! `#showPrivate` and `#collapseSideBar` controls) plus the documented
//! anchors, so the effect of a load or a click can be inspected as markup.
//! Uses [maud](https://maud.lambda.xyz/); all interpolation is escaped.

use maud::{DOCTYPE, Markup, html};

use crate::page::{Anchor, Page, PrivacyControl, SidebarControl};

// ============================================================================
// Controls
// ============================================================================

pub fn privacy_control(control: &PrivacyControl) -> Markup {
    html! {
        div #showPrivate {
            button.btn.btn-link type="button" data-toggle="private" { (control.label) }
        }
    }
}

pub fn sidebar_control(control: &SidebarControl) -> Markup {
    html! {
        div #collapseSideBar {
            a href="#" data-toggle="sidebar" { (control.glyph) }
            span.collapseSideBarLabel { (control.label) }
        }
    }
}

fn anchor_entry(anchor: &Anchor) -> Markup {
    let classes = anchor.container_classes.to_string();
    html! {
        div class=[(!classes.is_empty()).then_some(classes.as_str())] {
            a name=(anchor.name) {}
            code { (anchor.name) }
        }
    }
}

// ============================================================================
// Page
// ============================================================================

pub fn render_page(page: &Page) -> Markup {
    let body_class = page.body.to_string();
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (page.title) }
                link rel="canonical" href=(page.location.relative());
            }
            body class=[(!body_class.is_empty()).then_some(body_class.as_str())] {
                nav.navbar {
                    @if let Some(control) = &page.privacy_control {
                        (privacy_control(control))
                    }
                }
                @if page.sidebar {
                    @if let Some(control) = &page.sidebar_control {
                        div.sidebarcontainer {
                            (sidebar_control(control))
                        }
                    }
                }
                main {
                    @for anchor in &page.anchors {
                        (anchor_entry(anchor))
                    }
                }
            }
        }
    }
}
