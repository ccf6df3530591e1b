use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use ui::{SessionProvider, ToastProvider};
use views::{AdminDashboardPage, Index, LawyerDashboardPage, NotFound, ResetPasswordPage};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/?:..query")]
    Index { query: String },
    #[route("/dashboard/lawyer")]
    LawyerDashboardPage {},
    #[route("/dashboard/admin")]
    AdminDashboardPage {},
    #[route("/reset-password")]
    ResetPasswordPage {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    fn home() -> Self {
        Route::Index { query: String::new() }
    }
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    if let Err(e) = dioxus::logger::init(Level::INFO) {
        eprintln!("failed to initialise logging: {e}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Title { "Unseen Lawyers" }
        document::Link { rel: "stylesheet", href: ui::TAILWIND_CSS }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SessionProvider {
            ToastProvider {
                Router::<Route> {}
            }
        }
    }
}
