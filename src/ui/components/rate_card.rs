use dioxus::prelude::*;

/// Placeholder shown while the dollar rate has not arrived.
pub const PENDING: &str = "Loading...";

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_converted(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_else(|| PENDING.to_string())
}

/// One price box: the USD figure, its rupee conversion and an optional savings line.
#[component]
pub fn RateCard(
    title: String,
    usd: f64,
    pkr: Option<f64>,
    savings: Option<(f64, Option<f64>)>,
    highlight: bool,
) -> Element {
    let class = if highlight {
        "rate-card rate-card--highlight"
    } else {
        "rate-card"
    };
    let usd = format_amount(usd);
    let pkr = format_converted(pkr);
    let savings = savings.map(|(save_usd, save_pkr)| (format_amount(save_usd), format_converted(save_pkr)));

    rsx! {
        div { class,
            p { class: "rate-card__title", "{title}" }
            p { class: "rate-card__caption", "Rates In Dollar $" }
            div { class: "rate-card__amount", "{usd}" }
            p { class: "rate-card__converted",
                "In Rs : "
                span { class: "accent", "{pkr}" }
            }
            if let Some((save_usd, save_pkr)) = savings {
                div { class: "rate-card__savings",
                    p { "Save $: " span { class: "accent", "{save_usd}" } }
                    p { "Save Rs: " span { class: "accent", "{save_pkr}" } }
                }
            }
        }
    }
}
