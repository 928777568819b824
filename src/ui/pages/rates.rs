use dioxus::prelude::*;
use time::macros::format_description;

use crate::{
    app::{persist_user_state, ReloadTrigger},
    domain::{filter_countries, AppState, Category, LoadStatus, Weight},
    ui::{
        components::{PageLoader, RateCard},
        theme,
    },
};

const MAX_SUGGESTIONS: usize = 12;

/// Exact, case-insensitive match against the loaded country names.
pub fn canonical_country(countries: &[String], input: &str) -> Option<String> {
    let needle = input.trim();
    countries
        .iter()
        .find(|country| country.eq_ignore_ascii_case(needle))
        .cloned()
}

/// Country to keep selected after the input changes. Partial input keeps the
/// previous pick; clearing the box clears it.
pub fn next_country(countries: &[String], current: Option<String>, input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return None;
    }
    canonical_country(countries, input).or(current)
}

pub fn parse_weight(raw: &str) -> Option<Weight> {
    raw.trim().parse::<f64>().ok().and_then(Weight::from_kg)
}

/// Weights offered in the selector, keeping a custom pick visible.
pub fn weight_options(loaded: &[Weight], selected: Option<Weight>) -> Vec<Weight> {
    let mut options = loaded.to_vec();
    if let Some(weight) = selected {
        if !options.contains(&weight) {
            options.push(weight);
            options.sort();
        }
    }
    options
}

#[component]
pub fn ShippingRatesPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let reload = use_context::<ReloadTrigger>();

    let (selection, snapshot, status, exchange_rate) = state.with(|st| {
        (
            st.selection.clone(),
            st.snapshot.clone(),
            st.load_status,
            st.exchange_rate,
        )
    });
    let quote = state.with(|st| st.quote());
    let converted = quote.convert(exchange_rate);

    let mut query = use_signal(|| selection.country.clone().unwrap_or_default());
    let mut custom_weight = use_signal(String::new);

    let suggestions: Vec<String> = filter_countries(&snapshot.countries, &query())
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .collect();
    let weights = weight_options(&snapshot.weights, selection.weight);
    let selected_weight = selection.weight.map(|w| w.to_string()).unwrap_or_default();
    let country_label = selection.country.clone().unwrap_or_else(|| "-".to_string());
    let category = selection.category;

    let on_country = move |evt: FormEvent| {
        let raw = evt.value();
        query.set(raw.clone());
        let changed = state.with_mut(|st| {
            let next = next_country(&st.snapshot.countries, st.selection.country.clone(), &raw);
            let changed = next != st.selection.country;
            st.selection.country = next;
            changed
        });
        if changed {
            persist_user_state(&state);
        }
    };

    let on_weight = move |evt: FormEvent| {
        if let Some(weight) = parse_weight(&evt.value()) {
            custom_weight.set(String::new());
            state.with_mut(|st| st.selection.weight = Some(weight));
            persist_user_state(&state);
        }
    };

    let on_custom_weight = move |evt: FormEvent| {
        let raw = evt.value();
        custom_weight.set(raw.clone());
        if let Some(weight) = parse_weight(&raw) {
            state.with_mut(|st| st.selection.weight = Some(weight));
        }
    };

    let mut set_category = move |next: Category| {
        state.with_mut(|st| st.selection.category = next);
        persist_user_state(&state);
    };

    if status == LoadStatus::Loading && snapshot.is_empty() {
        return rsx! {
            PageLoader { message: Some("Fetching the latest rates...".to_string()) }
        };
    }

    let dollar_rate = exchange_rate
        .map(|rate| format!("Rs {}", rate.round()))
        .unwrap_or_else(|| "N/A".to_string());
    let (pill_class, pill_label) = theme::status_pill(status);
    let docs_too_heavy = category == Category::Docs
        && selection.weight.is_some_and(|w| w > Weight::DOCS_CEILING);
    let surcharge = (quote.surcharge > 0.0).then(|| format!("{:.2}", quote.surcharge));
    let complete = quote.is_complete();
    let gaps: Vec<String> = quote.gaps.iter().map(|gap| gap.describe()).collect();
    let updated = snapshot
        .loaded_at
        .and_then(|at| at.format(format_description!("[hour]:[minute]")).ok());

    rsx! {
        section { class: "rates",
            h1 { class: "rates__title", "Shipping Rates" }

            div { class: "rates__controls",
                div { class: "control-box",
                    label { class: "control",
                        strong { "Country : " }
                        input {
                            class: "control__input",
                            value: query(),
                            oninput: on_country,
                            list: "country-list",
                            placeholder: "e.g. UAE",
                        }
                        datalist { id: "country-list",
                            for country in suggestions.iter() {
                                option { value: country.clone() }
                            }
                        }
                    }
                    label { class: "control",
                        strong { "Kg : " }
                        select {
                            class: "control__input",
                            value: selected_weight.clone(),
                            onchange: on_weight,
                            for weight in weights.iter() {
                                option {
                                    value: weight.to_string(),
                                    selected: weight.to_string() == selected_weight,
                                    "{weight}"
                                }
                            }
                        }
                    }
                    label { class: "control",
                        span { "Other kg" }
                        input {
                            class: "control__input control__input--narrow",
                            inputmode: "decimal",
                            value: custom_weight(),
                            oninput: on_custom_weight,
                            placeholder: "30",
                        }
                    }
                }

                div { class: "toggle-group",
                    button {
                        class: theme::category_toggle_class(Category::Docs, category == Category::Docs),
                        onclick: move |_| set_category(Category::Docs),
                        "Docs"
                    }
                    button {
                        class: theme::category_toggle_class(Category::Pkg, category == Category::Pkg),
                        onclick: move |_| set_category(Category::Pkg),
                        "PKG"
                    }
                }
                span { class: pill_class, "{pill_label}" }
                if let Some(updated) = updated {
                    span { class: "muted", "Updated {updated}" }
                }
            }

            div { class: "rates__summary",
                span { class: "rates__category", "{category.label()}" }
                span { class: "rates__country", "{country_label}" }
                span { class: "rates__dollar", "Dollar Rate : " span { class: "accent", "{dollar_rate}" } }
            }

            RateCard {
                title: "Rates".to_string(),
                usd: quote.original,
                pkr: converted.map(|c| c.original),
                savings: None,
                highlight: false,
            }

            div { class: "rates__reload",
                button {
                    class: "reload-button",
                    title: "Reload rates",
                    onclick: move |_| reload.bump(),
                    "⟳"
                }
            }

            RateCard {
                title: "Discounted Rates".to_string(),
                usd: quote.discounted,
                pkr: converted.map(|c| c.discounted),
                savings: Some((quote.discount_dollar, converted.map(|c| c.discount))),
                highlight: true,
            }

            if let Some(surcharge) = surcharge {
                p { class: "rates__note", "Includes a ${surcharge} country surcharge." }
            }
            if docs_too_heavy {
                p { class: "rates__note rates__note--warn",
                    "Documents above 2 kg are not priced as DOCs. Switch to PKG for a rate."
                }
            }
            if !complete {
                ul { class: "rates__gaps",
                    for gap in gaps {
                        li { "{gap}" }
                    }
                }
            }
        }
    }
}
