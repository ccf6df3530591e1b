//! The public site: hero, services and the consultation form. Rendered for anonymous
//! visitors and, with the signed-in navbar, for clients.

use dioxus::prelude::*;

use crate::components::Card;
use crate::icons::{FaBriefcase, FaHouse, FaPeopleRoof, FaUserShield};
use crate::{ContactForm, Icon, Navbar};

const SERVICES: [(&str, &str); 4] = [
    ("Family Law", "Divorce, custody, maintenance and succession matters."),
    ("Property Disputes", "Tenancy, title and partition disputes handled end to end."),
    ("Corporate", "Contracts, compliance and advisory for growing businesses."),
    ("Criminal Defence", "Bail, trial representation and appeals."),
];

#[component]
pub fn PublicPage() -> Element {
    rsx! {
        Navbar {}
        main {
            class: "bg-neutral-50",

            section {
                class: "px-6 py-20 text-center bg-white",
                h1 {
                    class: "m-0 text-4xl font-bold text-neutral-900",
                    "Verified lawyers, without the guesswork"
                }
                p {
                    class: "mt-4 mx-auto max-w-2xl text-lg text-neutral-600",
                    "Tell us about your legal matter and we will connect you with an enrolled advocate who practises in that area."
                }
                a {
                    href: "#contact",
                    class: "inline-block mt-8 px-6 py-3 rounded bg-primary-600 text-white no-underline font-medium hover:bg-primary-700",
                    "Request a consultation"
                }
            }

            section {
                class: "px-6 py-16 max-w-5xl mx-auto",
                h2 { class: "m-0 mb-8 text-2xl font-semibold text-center text-neutral-900", "Practice Areas" }
                div {
                    class: "grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4",
                    for (index, (title, blurb)) in SERVICES.iter().enumerate() {
                        Card {
                            key: "{title}",
                            div {
                                class: "mb-3 text-primary-600",
                                match index {
                                    0 => rsx! { Icon { width: 22, height: 22, icon: FaPeopleRoof } },
                                    1 => rsx! { Icon { width: 22, height: 22, icon: FaHouse } },
                                    2 => rsx! { Icon { width: 22, height: 22, icon: FaBriefcase } },
                                    _ => rsx! { Icon { width: 22, height: 22, icon: FaUserShield } },
                                }
                            }
                            h3 { class: "m-0 text-base font-semibold text-neutral-800", "{title}" }
                            p { class: "m-0 mt-2 text-sm text-neutral-600", "{blurb}" }
                        }
                    }
                }
            }

            section {
                id: "contact",
                class: "px-6 py-16 max-w-2xl mx-auto",
                h2 { class: "m-0 mb-2 text-2xl font-semibold text-center text-neutral-900", "Get in Touch" }
                p {
                    class: "m-0 mb-8 text-center text-neutral-600",
                    "Your first consultation request is free."
                }
                Card {
                    ContactForm {}
                }
            }
        }
    }
}
