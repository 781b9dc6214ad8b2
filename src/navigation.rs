//! This file defines the templates and a convenience function for creating
//! the navigation bar.

use maud::{Markup, html};

use crate::{endpoints, html::APP_NAME};

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to `true`. Only one link
/// should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        if self.is_current {
            html!( a href=(self.url) class="current" { (self.title) } )
        } else {
            html!( a href=(self.url) { (self.title) } )
        }
    }
}

/// The navigation bar shown on every app page.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be marked as
    /// active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD,
            },
            Link {
                url: endpoints::EXPENSES,
                title: "Expenses",
                is_current: active_endpoint == endpoints::EXPENSES,
            },
            Link {
                url: endpoints::ADD_EXPENSE,
                title: "Add Expense",
                is_current: active_endpoint == endpoints::ADD_EXPENSE,
            },
            Link {
                url: endpoints::ANALYTICS,
                title: "Analytics",
                is_current: active_endpoint == endpoints::ANALYTICS,
            },
            Link {
                url: endpoints::EXPORT,
                title: "Export",
                is_current: active_endpoint == endpoints::EXPORT,
            },
        ];

        NavBar { links }
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        html! {
            nav class="nav"
            {
                span class="brand" { (APP_NAME) }

                @for link in self.links
                {
                    (link.into_html())
                }
            }
        }
    }
}
