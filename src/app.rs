use dioxus::{prelude::*, signals::Signal};
use tracing::{error, info, warn};

use crate::{
    config::AppConfig,
    domain::{AppState, LoadStatus, Province},
    infra::{gateway::GatewayClient, rates::load_snapshot, rates::RatesClient},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{ShippingRatesPage, UploadPage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Rates {},
    #[route("/admin/upload")]
    Upload {},
}

/// Bumped after a successful upload or clear so both loads run again.
#[derive(Clone, Copy, PartialEq)]
pub struct ReloadTrigger(Signal<u32>);

impl ReloadTrigger {
    pub fn generation(&self) -> u32 {
        (self.0)()
    }

    pub fn bump(mut self) {
        self.0.with_mut(|n| *n = n.wrapping_add(1));
    }
}

#[component]
pub fn App() -> Element {
    let config = use_hook(|| match AppConfig::load() {
        Ok(config) => Some(config),
        Err(err) => {
            error!("Invalid configuration: {err}");
            None
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        match config {
            Some(config) => rsx! { RatesApp { config } },
            None => rsx! {
                div { class: "config-error",
                    h1 { "Configuration error" }
                    p { "Check the RATES_* and EXCHANGE_* environment variables and restart." }
                }
            },
        }
    }
}

#[component]
fn RatesApp(config: AppConfig) -> Element {
    let state = use_signal(|| initial_state(config.default_province));
    use_context_provider(|| state);
    use_context_provider(|| config.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let reload = ReloadTrigger(use_signal(|| 0));
    use_context_provider(|| reload);

    // Only a province change should refetch, not every selection edit.
    let province = use_memo(move || state.read().province);

    let gateway_url = config.gateway_url.clone();
    let _exchange = use_resource(move || {
        let gateway_url = gateway_url.clone();
        let generation = reload.generation();
        async move { fetch_exchange_rate(gateway_url, generation, state, toasts).await }
    });

    let rates_url = config.rates_api_url.clone();
    let _rates = use_resource(move || {
        let rates_url = rates_url.clone();
        let province = province();
        let generation = reload.generation();
        async move { fetch_rates(rates_url, province, generation, state, toasts).await }
    });

    rsx! {
        Router::<Route> {}
        Toast {}
    }
}

fn initial_state(default_province: Province) -> AppState {
    let mut state = AppState {
        province: default_province,
        ..AppState::default()
    };
    if let Some(saved) = load_persisted_state() {
        state.apply_persisted(saved);
    }
    state
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!("Failed to persist user state: {err}");
    }
}

async fn fetch_exchange_rate(
    gateway_url: url::Url,
    generation: u32,
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
) -> Option<f64> {
    info!("Fetching dollar rate (generation {generation})");
    let client = match GatewayClient::new(gateway_url) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to initialise gateway client: {err}");
            push_toast(toasts, ToastKind::Error, "Failed to initialise gateway client.");
            return None;
        }
    };

    match client.dollar_rate().await {
        Ok(rate) => {
            state.with_mut(|st| st.exchange_rate = Some(rate));
            Some(rate)
        }
        Err(err) => {
            error!("Failed to fetch dollar rate: {err}");
            push_toast(
                toasts,
                ToastKind::Warning,
                format!("Dollar rate unavailable: {err}"),
            );
            None
        }
    }
}

async fn fetch_rates(
    rates_url: url::Url,
    province: Province,
    generation: u32,
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
) -> Option<usize> {
    info!("Loading {province} rates (generation {generation})");
    state.with_mut(|st| st.load_status = LoadStatus::Loading);

    let client = match RatesClient::new(rates_url) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to initialise rates client: {err}");
            state.with_mut(|st| st.load_status = LoadStatus::Failed);
            push_toast(toasts, ToastKind::Error, "Failed to initialise rates client.");
            return None;
        }
    };

    let snapshot = load_snapshot(&client, province).await;
    let countries = snapshot.countries.len();
    let empty = snapshot.is_empty();

    let applied = state.with_mut(|st| {
        // A slower load for a province the user already left is dropped.
        if st.province != province {
            return false;
        }
        st.replace_snapshot(snapshot);
        true
    });

    if !applied {
        return None;
    }
    if empty {
        push_toast(
            toasts,
            ToastKind::Warning,
            format!("No {} rates could be loaded.", province.label()),
        );
    }
    Some(countries)
}

#[component]
pub fn Rates() -> Element {
    rsx! { Shell { ShippingRatesPage {} } }
}

#[component]
pub fn Upload() -> Element {
    rsx! { Shell { UploadPage {} } }
}
