use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::app::{persist_user_state, Route};
use crate::domain::{AppState, Province};
use crate::ui::{components::Triangles, theme};
use crate::util::{
    assets,
    version::{version_label, APP_NAME, APP_TAGLINE},
};

const DEVELOPER: &str = "Tayyab";

#[component]
pub fn Shell(children: Element) -> Element {
    rsx! {
        div { class: "app",
            Navbar {}
            Triangles { class: Some("triangles triangles--corner".to_string()) }
            main { class: "app__main", {children} }
            Footer {}
        }
    }
}

#[component]
fn Navbar() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();
    let province = state.with(|st| st.province);

    let on_province = move |evt: FormEvent| {
        let Some(next) = Province::from_slug(&evt.value()) else {
            return;
        };
        state.with_mut(|st| st.set_province(next));
        persist_user_state(&state);
    };

    rsx! {
        header { class: "navbar",
            div { class: "navbar__brand",
                img { class: "navbar__logo", src: assets::logo_data_uri(), alt: "" }
                div {
                    h1 { class: "navbar__title", "{APP_NAME}" }
                    p { class: "navbar__tagline", "{APP_TAGLINE}" }
                }
            }
            nav { class: "navbar__links",
                NavButton {
                    active: matches!(current_route, Route::Rates {}),
                    onclick: move |_| { nav.push(Route::Rates {}); },
                    label: "Rates",
                }
                NavButton {
                    active: matches!(current_route, Route::Upload {}),
                    onclick: move |_| { nav.push(Route::Upload {}); },
                    label: "Admin",
                }
            }
            label { class: "navbar__province",
                span { "Province" }
                select {
                    value: province.slug(),
                    onchange: on_province,
                    for choice in Province::ALL {
                        option {
                            value: choice.slug(),
                            selected: choice == province,
                            "{choice.label()}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: theme::nav_link_class(active),
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}

#[component]
fn Footer() -> Element {
    let year = OffsetDateTime::now_utc().year();
    let version = version_label();
    rsx! {
        footer { class: "footer",
            p { "© {year} All rights reserved." }
            p { "Developed by {DEVELOPER} · {version}" }
        }
    }
}
