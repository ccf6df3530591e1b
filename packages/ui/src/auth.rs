//! Session context and hooks for the UI.
//!
//! [`SessionProvider`] builds the one [`AppSessionStore`] for the app, starts its
//! listener, and mirrors every published snapshot into a signal so components re-render
//! on identity and role changes.

use api::{AppSessionStore, Settings};
use dioxus::prelude::*;
use session::{SessionState, SessionStore};

/// The current session snapshot. Updates on sign-in, sign-out and role resolution.
pub fn use_session() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// The shared store, for actions (sign in, sign out, password reset, ...).
pub fn use_session_store() -> AppSessionStore {
    use_context::<AppSessionStore>()
}

pub fn use_settings() -> Settings {
    use_context::<Settings>()
}

/// Provider component that owns the session store.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let settings = use_hook(|| {
        Settings::new().unwrap_or_else(|e| {
            tracing::error!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        })
    });

    let store = use_hook({
        let settings = settings.clone();
        move || {
            let (auth, data) = api::connect(&settings);
            SessionStore::new(auth, data).with_site_url(site_url(&settings))
        }
    });

    let mut state = use_signal({
        let store = store.clone();
        move || store.snapshot()
    });

    // Start the listener and mirror snapshots into the signal, once.
    use_hook({
        let store = store.clone();
        move || {
            let mut updates = store.subscribe();
            spawn(store.initialize());
            spawn(async move {
                while updates.changed().await.is_ok() {
                    let snapshot = updates.borrow_and_update().clone();
                    state.set(snapshot);
                }
            });
        }
    });

    use_drop({
        let store = store.clone();
        move || store.teardown()
    });

    use_context_provider(|| settings.clone());
    use_context_provider(|| store.clone());
    use_context_provider(|| state);

    rsx! {
        {children}
    }
}

/// Configured site URL, or the page origin in the browser.
fn site_url(settings: &Settings) -> String {
    if !settings.site_url.is_empty() {
        return settings.site_url.clone();
    }
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            return origin;
        }
    }
    String::new()
}

/// Button to sign out the current user.
#[component]
pub fn SignOutButton(
    #[props(default = "Sign Out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let store = use_session_store();
    let mut busy = use_signal(|| false);

    let onclick = move |_| {
        let store = store.clone();
        async move {
            busy.set(true);
            store.sign_out().await;
            busy.set(false);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: busy(),
            onclick: onclick,
            "{label}"
        }
    }
}
