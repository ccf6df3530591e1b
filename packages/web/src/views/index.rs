use dioxus::prelude::*;
use session::router::{bypass_requested, resolve_root};
use session::{Dashboard, RootView};
use ui::use_session;
use ui::views::{LoadingScreen, PublicPage};

use crate::Route;

pub(crate) fn dashboard_route(dashboard: Dashboard) -> Route {
    match dashboard {
        Dashboard::Lawyer => Route::LawyerDashboardPage {},
        Dashboard::Admin => Route::AdminDashboardPage {},
    }
}

/// `/`: public site for visitors and clients, dashboard redirect for lawyers and admins
/// unless `bypass_redirect=true` is present.
#[component]
pub fn Index(query: String) -> Element {
    let session = use_session();
    let nav = use_navigator();
    let bypass = bypass_requested(&query);

    use_effect(use_reactive!(|bypass| {
        if let RootView::Redirect(dashboard) = resolve_root(&session(), bypass) {
            tracing::debug!("redirecting signed-in user to {}", dashboard.path());
            nav.replace(dashboard_route(dashboard));
        }
    }));

    match resolve_root(&session(), bypass) {
        RootView::Waiting | RootView::Redirect(_) => rsx! { LoadingScreen {} },
        RootView::Landing | RootView::Home => rsx! { PublicPage {} },
    }
}

/// Unknown paths go back to `/`.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let nav = use_navigator();
    use_effect(move || {
        tracing::debug!("no route for /{}", segments.join("/"));
        nav.replace(Route::home());
    });
    rsx! { LoadingScreen {} }
}
