use dioxus::prelude::*;

#[component]
pub fn PageLoader(message: Option<String>) -> Element {
    rsx! {
        div { class: "page-loader",
            div { class: "page-loader__plane", "✈" }
            div { class: "page-loader__track",
                span { class: "page-loader__dot" }
                span { class: "page-loader__dot" }
                span { class: "page-loader__dot" }
            }
            if let Some(message) = message {
                p { class: "page-loader__text", "{message}" }
            }
        }
    }
}
