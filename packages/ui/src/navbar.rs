use dioxus::prelude::*;
use session::forms::AuthView;
use session::RoleAssignment;

use crate::auth_dialog::AuthDialog;
use crate::components::{Button, ButtonVariant};
use crate::icons::{FaGaugeHigh, FaScaleBalanced, FaUser};
use crate::{use_session, Icon, SignOutButton};

/// Top bar: brand, then either the sign-in entry points or the signed-in user's name,
/// dashboard link and sign-out.
#[component]
pub fn Navbar() -> Element {
    let session = use_session();
    let mut dialog = use_signal(|| Option::<AuthView>::None);

    let state = session();
    let name = state.display_name().unwrap_or_default().to_string();
    let dashboard = match state.role {
        RoleAssignment::Lawyer => Some(("/dashboard/lawyer", "Dashboard")),
        RoleAssignment::Admin => Some(("/dashboard/admin", "Admin")),
        RoleAssignment::Client | RoleAssignment::Unresolved => None,
    };

    rsx! {
        nav {
            class: "sticky top-0 flex items-center justify-between px-6 py-3 bg-white border-b border-neutral-200",
            style: "z-index: 1000",
            Link {
                to: "/?bypass_redirect=true",
                class: "flex items-center gap-2 no-underline text-neutral-900 font-bold text-lg",
                Icon { width: 20, height: 20, icon: FaScaleBalanced }
                "Unseen Lawyers"
            }

            div {
                class: "flex items-center gap-3",
                if state.loading {
                    span { class: "text-sm text-neutral-400", "..." }
                } else if state.is_signed_in() {
                    if let Some((path, label)) = dashboard {
                        Link {
                            to: path,
                            class: "flex items-center gap-1.5 text-sm text-neutral-700 no-underline hover:text-primary-600",
                            Icon { width: 14, height: 14, icon: FaGaugeHigh }
                            "{label}"
                        }
                    }
                    span {
                        class: "flex items-center gap-1.5 text-sm text-neutral-700",
                        Icon { width: 14, height: 14, icon: FaUser }
                        "{name}"
                    }
                    SignOutButton {
                        class: "px-3 py-1.5 text-sm bg-white border border-neutral-300 rounded cursor-pointer hover:bg-neutral-50",
                    }
                } else {
                    Button {
                        variant: ButtonVariant::Ghost,
                        onclick: move |_| dialog.set(Some(AuthView::Login)),
                        "Sign In"
                    }
                    Button {
                        variant: ButtonVariant::Primary,
                        onclick: move |_| dialog.set(Some(AuthView::SignUp)),
                        "Get Started"
                    }
                }
            }
        }

        if let Some(view) = dialog() {
            AuthDialog {
                initial_view: view,
                on_close: move |_| dialog.set(None),
            }
        }
    }
}
