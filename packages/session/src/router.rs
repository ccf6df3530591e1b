//! View selection for the root route and the dashboard guards.
//!
//! These are plain functions over a [`SessionState`] snapshot so the Dioxus views stay
//! declarative. An identity whose role is still [`RoleAssignment::Unresolved`] is routed
//! like a client: dashboard chrome is never shown before the role is known.

use crate::models::{Role, RoleAssignment};
use crate::store::SessionState;

/// Query flag that keeps a role-holder on the public page.
pub const BYPASS_REDIRECT_PARAM: &str = "bypass_redirect";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    Lawyer,
    Admin,
}

impl Dashboard {
    pub fn path(&self) -> &'static str {
        match self {
            Dashboard::Lawyer => "/dashboard/lawyer",
            Dashboard::Admin => "/dashboard/admin",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Dashboard::Lawyer => Role::Lawyer,
            Dashboard::Admin => Role::Admin,
        }
    }
}

/// What `/` renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootView {
    /// Session still resolving; render a neutral placeholder.
    Waiting,
    /// Anonymous landing page.
    Landing,
    /// Public content with authenticated chrome.
    Home,
    Redirect(Dashboard),
}

/// Outcome of a dashboard's own access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAccess {
    Waiting,
    Granted,
    /// Send the visitor to `/`.
    Denied,
}

pub fn resolve_root(state: &SessionState, bypass_requested: bool) -> RootView {
    if state.loading {
        return RootView::Waiting;
    }
    if state.identity.is_none() {
        return RootView::Landing;
    }
    if bypass_requested {
        return RootView::Home;
    }
    match state.role {
        RoleAssignment::Lawyer => RootView::Redirect(Dashboard::Lawyer),
        RoleAssignment::Admin => RootView::Redirect(Dashboard::Admin),
        RoleAssignment::Client | RoleAssignment::Unresolved => RootView::Home,
    }
}

/// Checked by each dashboard independently of [`resolve_root`]: direct URL entry and
/// stale bookmarks never pass through the root route.
pub fn guard_dashboard(state: &SessionState, dashboard: Dashboard) -> DashboardAccess {
    if state.loading {
        return DashboardAccess::Waiting;
    }
    if state.identity.is_some() && state.role.role() == Some(dashboard.role()) {
        DashboardAccess::Granted
    } else {
        DashboardAccess::Denied
    }
}

/// `true` only for an explicit `bypass_redirect=true` in a query string.
pub fn bypass_requested(query: &str) -> bool {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key == BYPASS_REDIRECT_PARAM && value == "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use uuid::Uuid;

    fn state(identity: bool, role: RoleAssignment) -> SessionState {
        SessionState {
            identity: identity.then(|| Identity {
                id: Uuid::new_v4(),
                email: "someone@x.com".to_string(),
            }),
            role,
            loading: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_waiting_while_loading() {
        let loading = SessionState::default();
        assert_eq!(resolve_root(&loading, false), RootView::Waiting);
        assert_eq!(resolve_root(&loading, true), RootView::Waiting);
        assert_eq!(guard_dashboard(&loading, Dashboard::Admin), DashboardAccess::Waiting);
    }

    #[test]
    fn test_anonymous_gets_landing() {
        assert_eq!(resolve_root(&state(false, RoleAssignment::Unresolved), false), RootView::Landing);
        assert_eq!(resolve_root(&state(false, RoleAssignment::Unresolved), true), RootView::Landing);
    }

    #[test]
    fn test_lawyer_redirects_unless_bypassed() {
        let lawyer = state(true, RoleAssignment::Lawyer);
        assert_eq!(resolve_root(&lawyer, false), RootView::Redirect(Dashboard::Lawyer));
        assert_eq!(resolve_root(&lawyer, true), RootView::Home);
    }

    #[test]
    fn test_admin_redirects_unless_bypassed() {
        let admin = state(true, RoleAssignment::Admin);
        assert_eq!(resolve_root(&admin, false), RootView::Redirect(Dashboard::Admin));
        assert_eq!(resolve_root(&admin, true), RootView::Home);
    }

    #[test]
    fn test_client_and_unresolved_share_home() {
        assert_eq!(resolve_root(&state(true, RoleAssignment::Client), false), RootView::Home);
        assert_eq!(resolve_root(&state(true, RoleAssignment::Unresolved), false), RootView::Home);
    }

    #[test]
    fn test_dashboard_guard() {
        let client = state(true, RoleAssignment::Client);
        assert_eq!(guard_dashboard(&client, Dashboard::Admin), DashboardAccess::Denied);
        assert_eq!(guard_dashboard(&client, Dashboard::Lawyer), DashboardAccess::Denied);

        let unresolved = state(true, RoleAssignment::Unresolved);
        assert_eq!(guard_dashboard(&unresolved, Dashboard::Lawyer), DashboardAccess::Denied);

        let anonymous = state(false, RoleAssignment::Unresolved);
        assert_eq!(guard_dashboard(&anonymous, Dashboard::Admin), DashboardAccess::Denied);

        let admin = state(true, RoleAssignment::Admin);
        assert_eq!(guard_dashboard(&admin, Dashboard::Admin), DashboardAccess::Granted);
        assert_eq!(guard_dashboard(&admin, Dashboard::Lawyer), DashboardAccess::Denied);
    }

    #[test]
    fn test_bypass_flag_parsing() {
        assert!(bypass_requested("?bypass_redirect=true"));
        assert!(bypass_requested("ref=nav&bypass_redirect=true"));
        assert!(!bypass_requested("bypass_redirect=1"));
        assert!(!bypass_requested("bypass_redirect"));
        assert!(!bypass_requested(""));
    }
}
