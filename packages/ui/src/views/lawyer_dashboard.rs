use dioxus::prelude::*;
use session::profile::load_profile;
use session::Profile;

use crate::components::{Button, ButtonVariant, Card, Spinner};
use crate::icons::{FaBuildingColumns, FaIdCard, FaLocationDot, FaPen};
use crate::{use_session, use_session_store, Icon, LawyerProfileEditor, Navbar};

/// Dashboard body for a lawyer. Access is checked by the route before this renders.
#[component]
pub fn LawyerDashboard() -> Element {
    let session = use_session();
    let store = use_session_store();
    let mut editing = use_signal(|| false);

    let user_id = session().user_id();

    let mut profile = use_resource(move || {
        let store = store.clone();
        async move {
            match user_id {
                Some(user_id) => load_profile(store.data(), user_id).await,
                None => Ok(None),
            }
        }
    });

    let name = session().display_name().unwrap_or("Counsel").to_string();

    rsx! {
        Navbar {}
        main {
            class: "max-w-4xl mx-auto px-6 py-10 flex flex-col gap-6",
            div {
                h1 { class: "m-0 text-2xl font-bold text-neutral-900", "Lawyer Dashboard" }
                p { class: "m-0 mt-1 text-neutral-600", "Welcome, {name}" }
            }

            match profile() {
                None => rsx! { div { class: "flex justify-center py-10", Spinner {} } },
                Some(Err(e)) => rsx! {
                    Card {
                        p { class: "m-0 text-red-600", "Could not load your profile: {e}" }
                    }
                },
                Some(Ok(loaded)) => match user_id {
                    None => rsx! {},
                    Some(user_id) if editing() => {
                        rsx! {
                            Card {
                                LawyerProfileEditor {
                                    user_id,
                                    profile: loaded,
                                    on_saved: move |_| {
                                        editing.set(false);
                                        profile.restart();
                                    },
                                    on_cancel: move |_| editing.set(false),
                                }
                            }
                        }
                    }
                    Some(_) => rsx! {
                        ProfileSummary {
                            profile: loaded,
                            on_edit: move |_| editing.set(true),
                        }
                    },
                },
            }
        }
    }
}

#[component]
fn ProfileSummary(profile: Option<Profile>, on_edit: EventHandler<()>) -> Element {
    let Some(profile) = profile else {
        return rsx! {
            Card {
                class: "flex flex-col items-start gap-3",
                p { class: "m-0 text-neutral-700", "Your profile is not set up yet. Clients only see lawyers with a complete profile." }
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: move |_| on_edit.call(()),
                    "Complete Profile"
                }
            }
        };
    };

    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "Not provided".to_string());
    let enrollment = text(&profile.enrollment_number);
    let university = text(&profile.law_degree_university);
    let location = match (&profile.city, &profile.state) {
        (Some(city), Some(state)) => format!("{city}, {state}"),
        (Some(place), None) | (None, Some(place)) => place.clone(),
        (None, None) => "Not provided".to_string(),
    };
    let experience = profile
        .years_of_experience
        .map(|years| format!("{years} years"))
        .unwrap_or_else(|| "Not provided".to_string());
    let areas = profile.practice_areas.clone().unwrap_or_default();
    let full_name = text(&profile.full_name);

    rsx! {
        Card {
            class: "flex flex-col gap-5",
            div {
                class: "flex items-start justify-between",
                div {
                    h2 { class: "m-0 text-lg font-semibold text-neutral-900", "{full_name}" }
                    if let Some(bio) = &profile.bio {
                        p { class: "m-0 mt-1 text-sm text-neutral-600", "{bio}" }
                    }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| on_edit.call(()),
                    Icon { width: 12, height: 12, icon: FaPen }
                    "Edit Profile"
                }
            }
            div {
                class: "grid grid-cols-1 md:grid-cols-2 gap-4 text-sm text-neutral-700",
                SummaryRow { label: "Enrollment", value: enrollment, icon: rsx! { Icon { width: 14, height: 14, icon: FaIdCard } } }
                SummaryRow { label: "University", value: university, icon: rsx! { Icon { width: 14, height: 14, icon: FaBuildingColumns } } }
                SummaryRow { label: "Location", value: location, icon: rsx! { Icon { width: 14, height: 14, icon: FaLocationDot } } }
                SummaryRow { label: "Experience", value: experience, icon: rsx! { Icon { width: 14, height: 14, icon: FaIdCard } } }
            }
            if !areas.is_empty() {
                div {
                    class: "flex flex-wrap gap-2",
                    for area in areas {
                        span {
                            key: "{area}",
                            class: "px-2.5 py-1 rounded-full bg-primary-50 text-primary-700 text-xs font-medium",
                            "{area}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SummaryRow(label: String, value: String, icon: Element) -> Element {
    rsx! {
        div {
            class: "flex items-center gap-2",
            span { class: "text-neutral-400", {icon} }
            span { class: "text-neutral-500", "{label}:" }
            span { class: "font-medium", "{value}" }
        }
    }
}
