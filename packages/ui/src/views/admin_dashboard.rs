use dioxus::prelude::*;
use session::{Directory, DirectoryEntry};

use crate::components::{Button, ButtonVariant, Card, Spinner, StatCard};
use crate::icons::{FaRotate, FaScaleBalanced, FaTriangleExclamation, FaUserShield, FaUsers};
use crate::{use_session_store, Icon, Navbar};

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Lawyers,
    Clients,
    Unresolved,
}

/// Admin overview: user counts by role and the lawyer and client tables.
#[component]
pub fn AdminDashboard() -> Element {
    let store = use_session_store();
    let mut tab = use_signal(|| Tab::Lawyers);

    let mut directory = use_resource(move || {
        let store = store.clone();
        async move { Directory::load(store.data()).await }
    });

    rsx! {
        Navbar {}
        main {
            class: "max-w-6xl mx-auto px-6 py-10 flex flex-col gap-6",
            div {
                class: "flex items-center justify-between",
                div {
                    h1 { class: "m-0 text-2xl font-bold text-neutral-900", "Admin Dashboard" }
                    p { class: "m-0 mt-1 text-neutral-600", "Manage users and lawyers" }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| directory.restart(),
                    Icon { width: 12, height: 12, icon: FaRotate }
                    "Refresh"
                }
            }

            match directory() {
                None => rsx! { div { class: "flex justify-center py-10", Spinner {} } },
                Some(Err(e)) => rsx! {
                    Card {
                        p { class: "m-0 text-red-600", "Error fetching users: {e}" }
                    }
                },
                Some(Ok(directory)) => {
                    let lawyers = directory.lawyers().into_iter().cloned().collect::<Vec<_>>();
                    let clients = directory.clients().into_iter().cloned().collect::<Vec<_>>();
                    let unresolved = directory.unresolved().into_iter().cloned().collect::<Vec<_>>();
                    let admins = directory.admins().len();
                    let total = directory.entries.len();
                    let conflicts = directory.conflicts.len();
                    let (lawyer_count, client_count, unresolved_count) = (lawyers.len(), clients.len(), unresolved.len());
                    let rows = match tab() {
                        Tab::Lawyers => lawyers,
                        Tab::Clients => clients,
                        Tab::Unresolved => unresolved,
                    };
                    rsx! {
                        div {
                            class: "grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4",
                            StatCard { label: "Total Users", value: total, icon: rsx! { Icon { width: 22, height: 22, icon: FaUsers } } }
                            StatCard { label: "Clients", value: client_count, icon: rsx! { Icon { width: 22, height: 22, icon: FaUsers } } }
                            StatCard { label: "Lawyers", value: lawyer_count, icon: rsx! { Icon { width: 22, height: 22, icon: FaScaleBalanced } } }
                            StatCard { label: "Admins", value: admins, icon: rsx! { Icon { width: 22, height: 22, icon: FaUserShield } } }
                        }

                        if conflicts > 0 {
                            div {
                                class: "flex items-center gap-2 p-3 rounded bg-amber-50 border border-amber-200 text-amber-800 text-sm",
                                Icon { width: 14, height: 14, icon: FaTriangleExclamation }
                                "{conflicts} user(s) have more than one role row and are listed as unassigned."
                            }
                        }

                        Card {
                            class: "flex flex-col gap-4",
                            div {
                                class: "flex gap-2",
                                TabButton { label: "Lawyers ({lawyer_count})", active: tab() == Tab::Lawyers, onclick: move |_| tab.set(Tab::Lawyers) }
                                TabButton { label: "Clients ({client_count})", active: tab() == Tab::Clients, onclick: move |_| tab.set(Tab::Clients) }
                                TabButton { label: "Unassigned ({unresolved_count})", active: tab() == Tab::Unresolved, onclick: move |_| tab.set(Tab::Unresolved) }
                            }
                            UserTable { rows, show_enrollment: tab() == Tab::Lawyers }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TabButton(label: String, active: bool, onclick: EventHandler<MouseEvent>) -> Element {
    rsx! {
        Button {
            variant: if active { ButtonVariant::Secondary } else { ButtonVariant::Ghost },
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}

#[component]
fn UserTable(rows: Vec<DirectoryEntry>, show_enrollment: bool) -> Element {
    if rows.is_empty() {
        return rsx! {
            p { class: "m-0 py-6 text-center text-sm text-neutral-500", "No users found." }
        };
    }

    rsx! {
        div {
            class: "overflow-x-auto",
            table {
                class: "w-full text-sm text-left",
                thead {
                    class: "text-neutral-500 border-b border-neutral-200",
                    tr {
                        th { class: "py-2 pr-4 font-medium", "Name" }
                        th { class: "py-2 pr-4 font-medium", "Email" }
                        th { class: "py-2 pr-4 font-medium", "Phone" }
                        if show_enrollment {
                            th { class: "py-2 pr-4 font-medium", "Enrollment" }
                            th { class: "py-2 pr-4 font-medium", "Practice Areas" }
                        }
                        th { class: "py-2 font-medium", "City" }
                    }
                }
                tbody {
                    for entry in rows {
                        UserRow { key: "{entry.profile.user_id}", entry, show_enrollment }
                    }
                }
            }
        }
    }
}

#[component]
fn UserRow(entry: DirectoryEntry, show_enrollment: bool) -> Element {
    let na = |value: &Option<String>| value.clone().unwrap_or_else(|| "N/A".to_string());
    let name = entry.display_name().to_string();
    let email = na(&entry.profile.email);
    let phone = na(&entry.profile.phone);
    let enrollment = na(&entry.profile.enrollment_number);
    let areas = entry
        .profile
        .practice_areas
        .as_ref()
        .filter(|areas| !areas.is_empty())
        .map(|areas| areas.join(", "))
        .unwrap_or_else(|| "N/A".to_string());
    let city = na(&entry.profile.city);

    rsx! {
        tr {
            class: "border-b border-neutral-100 text-neutral-800",
            td { class: "py-2 pr-4 font-medium", "{name}" }
            td { class: "py-2 pr-4", "{email}" }
            td { class: "py-2 pr-4", "{phone}" }
            if show_enrollment {
                td { class: "py-2 pr-4", "{enrollment}" }
                td { class: "py-2 pr-4", "{areas}" }
            }
            td { class: "py-2", "{city}" }
        }
    }
}
