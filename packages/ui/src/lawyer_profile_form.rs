use dioxus::prelude::*;
use session::forms::LawyerProfileForm;
use session::profile::save_lawyer_profile;
use session::{Profile, UserId};

use crate::components::{Button, ButtonVariant, Field, Label, TextArea};
use crate::toast::{show_toast, use_toasts, ToastKind};
use crate::use_session_store;

/// Editor for the signed-in lawyer's profile row.
#[component]
pub fn LawyerProfileEditor(
    user_id: UserId,
    profile: Option<Profile>,
    on_saved: EventHandler<Profile>,
    on_cancel: EventHandler<()>,
) -> Element {
    let store = use_session_store();
    let mut toasts = use_toasts();
    let mut form = use_signal(move || {
        profile
            .as_ref()
            .map(LawyerProfileForm::from_profile)
            .unwrap_or_default()
    });
    let mut saving = use_signal(|| false);

    let handle_save = move |evt: FormEvent| {
        evt.prevent_default();
        let store = store.clone();
        spawn(async move {
            let update = match form().validate() {
                Ok(update) => update,
                Err(e) => {
                    show_toast(&mut toasts, ToastKind::Error, "Missing information", &e.to_string());
                    return;
                }
            };
            saving.set(true);
            let result = save_lawyer_profile(store.data(), user_id, &update).await;
            saving.set(false);
            match result {
                Ok(saved) => {
                    // The navbar shows the profile name.
                    store.refresh_profile().await;
                    show_toast(&mut toasts, ToastKind::Success, "Profile updated", "Your profile has been saved successfully.");
                    on_saved.call(saved);
                }
                Err(e) => show_toast(&mut toasts, ToastKind::Error, "Error saving profile", &e.to_string()),
            }
        });
    };

    rsx! {
        form {
            onsubmit: handle_save,
            class: "flex flex-col gap-6",

            section {
                class: "flex flex-col gap-4",
                h3 { class: "m-0 text-base font-semibold text-neutral-800", "Personal Information" }
                div {
                    class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                    Field { id: "lp-full-name", label: "Full Name *", value: form().full_name, oninput: move |v: String| form.write().full_name = v }
                    Field { id: "lp-phone", label: "Phone", r#type: "tel", value: form().phone, oninput: move |v: String| form.write().phone = v }
                    Field { id: "lp-dob", label: "Date of Birth", r#type: "date", value: form().date_of_birth, oninput: move |v: String| form.write().date_of_birth = v }
                    Field { id: "lp-father", label: "Father's / Husband's Name", value: form().father_husband_name, oninput: move |v: String| form.write().father_husband_name = v }
                    Field { id: "lp-nationality", label: "Nationality", value: form().nationality, oninput: move |v: String| form.write().nationality = v }
                }
                div {
                    class: "flex flex-col gap-1.5",
                    Label { html_for: "lp-bio", "Bio" }
                    TextArea {
                        id: "lp-bio",
                        class: "w-full",
                        placeholder: "Tell clients about your practice",
                        value: form().bio,
                        oninput: move |evt: FormEvent| form.write().bio = evt.value(),
                    }
                }
            }

            section {
                class: "flex flex-col gap-4",
                h3 { class: "m-0 text-base font-semibold text-neutral-800", "Bar Enrollment" }
                div {
                    class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                    Field { id: "lp-enrollment", label: "Enrollment Number *", value: form().enrollment_number, oninput: move |v: String| form.write().enrollment_number = v }
                    Field { id: "lp-enrollment-date", label: "Enrollment Date", r#type: "date", value: form().enrollment_date, oninput: move |v: String| form.write().enrollment_date = v }
                    Field { id: "lp-university", label: "Law Degree University *", value: form().law_degree_university, oninput: move |v: String| form.write().law_degree_university = v }
                    Field { id: "lp-experience", label: "Years of Experience", r#type: "number", value: form().years_of_experience, oninput: move |v: String| form.write().years_of_experience = v }
                }
                Field {
                    id: "lp-practice-areas",
                    label: "Practice Areas",
                    placeholder: "Family Law, Property, Criminal",
                    value: form().practice_areas,
                    oninput: move |v: String| form.write().practice_areas = v,
                }
            }

            section {
                class: "flex flex-col gap-4",
                h3 { class: "m-0 text-base font-semibold text-neutral-800", "Office" }
                Field { id: "lp-address", label: "Office Address", value: form().office_address, oninput: move |v: String| form.write().office_address = v }
                div {
                    class: "grid grid-cols-1 md:grid-cols-2 gap-4",
                    Field { id: "lp-city", label: "City", value: form().city, oninput: move |v: String| form.write().city = v }
                    Field { id: "lp-state", label: "State", value: form().state, oninput: move |v: String| form.write().state = v }
                }
                Field { id: "lp-linkedin", label: "LinkedIn URL", r#type: "url", value: form().linkedin_url, oninput: move |v: String| form.write().linkedin_url = v }
            }

            div {
                class: "flex gap-2",
                Button {
                    variant: ButtonVariant::Primary,
                    r#type: "submit",
                    disabled: saving(),
                    if saving() { "Saving..." } else { "Save Profile" }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
            }
        }
    }
}
