use std::time::Duration;

use dioxus::prelude::*;

use crate::icons::{FaCircleCheck, FaCircleExclamation, FaCircleInfo, FaXmark};
use crate::Icon;

const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn class(&self) -> &'static str {
        match self {
            ToastKind::Info => "bg-primary-50 border-primary-200 text-primary-800",
            ToastKind::Success => "bg-white border-neutral-200 text-neutral-800",
            ToastKind::Error => "bg-red-50 border-red-200 text-red-700",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Default)]
pub struct Toasts {
    pub items: Vec<Toast>,
    next_id: u64,
}

pub fn use_toasts() -> Signal<Toasts> {
    use_context::<Signal<Toasts>>()
}

/// Show a notice and dismiss it after a few seconds.
pub fn show_toast(toasts: &mut Signal<Toasts>, kind: ToastKind, title: &str, description: &str) {
    let id = {
        let mut list = toasts.write();
        list.next_id += 1;
        let id = list.next_id;
        list.items.push(Toast {
            id,
            kind,
            title: title.to_string(),
            description: description.to_string(),
        });
        id
    };

    let mut toasts = *toasts;
    spawn(async move {
        sleep(TOAST_LIFETIME).await;
        toasts.write().items.retain(|toast| toast.id != id);
    });
}

pub async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

/// Provides the toast list and renders it in the corner of the page.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let mut toasts = use_context_provider(|| Signal::new(Toasts::default()));

    rsx! {
        {children}
        div {
            class: "fixed bottom-4 right-4 flex flex-col gap-2 w-80",
            style: "z-index: 3000",
            for (toast, tone) in toasts().items.into_iter().map(|t| { let tone = t.kind.class(); (t, tone) }) {
                div {
                    key: "{toast.id}",
                    class: "toast-enter flex gap-3 p-4 rounded-lg shadow-lg border {tone}",
                    match toast.kind {
                        ToastKind::Error => rsx! { Icon { width: 16, height: 16, icon: FaCircleExclamation } },
                        ToastKind::Info => rsx! { Icon { width: 16, height: 16, icon: FaCircleInfo } },
                        ToastKind::Success => rsx! { Icon { width: 16, height: 16, icon: FaCircleCheck } },
                    }
                    div {
                        class: "flex-1",
                        p { class: "m-0 text-sm font-semibold", "{toast.title}" }
                        if !toast.description.is_empty() {
                            p { class: "m-0 mt-0.5 text-sm opacity-80", "{toast.description}" }
                        }
                    }
                    button {
                        class: "bg-transparent border-none cursor-pointer opacity-60 hover:opacity-100",
                        onclick: move |_| toasts.write().items.retain(|t| t.id != toast.id),
                        Icon { width: 12, height: 12, icon: FaXmark }
                    }
                }
            }
        }
    }
}
