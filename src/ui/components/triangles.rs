use dioxus::prelude::*;

const OUTLINE: &str = "M 50 0 L 0 100 L 100 100 L 50 0 M 50 0 L 20 90 L 80 90 L 54 20";

/// Two stacked gradient triangles used as page decoration.
#[component]
pub fn Triangles(class: Option<String>) -> Element {
    let class = class.unwrap_or_else(|| "triangles".to_string());
    rsx! {
        div { class: "{class}", aria_hidden: "true",
            svg { view_box: "0 0 200 200", class: "triangles__front",
                defs {
                    linearGradient { id: "tri-front", x1: "0%", y1: "0%", x2: "100%", y2: "100%",
                        stop { offset: "0%", stop_color: "#FF5B2E" }
                        stop { offset: "100%", stop_color: "#FFAA88" }
                    }
                }
                path { d: OUTLINE, fill: "url(#tri-front)", fill_rule: "evenodd" }
            }
            svg { view_box: "0 0 200 200", class: "triangles__back",
                defs {
                    linearGradient { id: "tri-back", x1: "0%", y1: "0%", x2: "100%", y2: "100%",
                        stop { offset: "0%", stop_color: "rgba(255, 255, 255, 0.8)" }
                        stop { offset: "100%", stop_color: "rgba(255, 255, 255, 0.8)" }
                    }
                }
                path { d: OUTLINE, fill: "url(#tri-back)", fill_rule: "evenodd" }
            }
        }
    }
}
