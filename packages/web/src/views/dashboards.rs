use dioxus::prelude::*;
use session::router::guard_dashboard;
use session::{Dashboard, DashboardAccess};
use ui::use_session;
use ui::views::{AdminDashboard, LawyerDashboard, LoadingScreen};

use crate::Route;

/// Renders `children` only once the session holds the role `dashboard` requires.
/// Anyone else is sent back to `/`.
#[component]
fn Guarded(dashboard: Dashboard, children: Element) -> Element {
    let session = use_session();
    let nav = use_navigator();

    use_effect(use_reactive!(|dashboard| {
        if guard_dashboard(&session(), dashboard) == DashboardAccess::Denied {
            tracing::info!("access to {} denied", dashboard.path());
            nav.replace(Route::home());
        }
    }));

    match guard_dashboard(&session(), dashboard) {
        DashboardAccess::Granted => children,
        DashboardAccess::Waiting | DashboardAccess::Denied => rsx! { LoadingScreen {} },
    }
}

#[component]
pub fn LawyerDashboardPage() -> Element {
    rsx! {
        Guarded { dashboard: Dashboard::Lawyer, LawyerDashboard {} }
    }
}

#[component]
pub fn AdminDashboardPage() -> Element {
    rsx! {
        Guarded { dashboard: Dashboard::Admin, AdminDashboard {} }
    }
}
