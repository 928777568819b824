use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{
    entities::{Category, Province, Weight},
    pricing::{derive_quote, Quote, Selection},
    rate_table::RateSnapshot,
};

/// Country the rates page opens on before the user picks one.
pub const DEFAULT_COUNTRY: &str = "UAE";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub province: Province,
    pub selection: Selection,
    /// Replaced wholesale on every load.
    pub snapshot: Arc<RateSnapshot>,
    pub load_status: LoadStatus,
    /// PKR per USD; `None` until the gateway answers.
    pub exchange_rate: Option<f64>,
    pub admin_unlocked: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            province: Province::default(),
            selection: Selection {
                country: Some(DEFAULT_COUNTRY.to_string()),
                weight: Weight::from_kg(0.5),
                category: Category::Docs,
            },
            snapshot: Arc::new(RateSnapshot::default()),
            load_status: LoadStatus::Idle,
            exchange_rate: None,
            admin_unlocked: false,
        }
    }
}

impl AppState {
    pub fn quote(&self) -> Quote {
        derive_quote(&self.selection, &self.snapshot)
    }

    pub fn replace_snapshot(&mut self, snapshot: RateSnapshot) {
        self.load_status = if snapshot.is_empty() {
            LoadStatus::Failed
        } else {
            LoadStatus::Loaded
        };
        self.snapshot = Arc::new(snapshot);
    }

    pub fn set_province(&mut self, province: Province) {
        if self.province != province {
            self.province = province;
            self.snapshot = Arc::new(RateSnapshot::default());
            self.load_status = LoadStatus::Idle;
        }
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.province = persisted.province;
        if persisted.selection.country.is_some() {
            self.selection = persisted.selection;
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            province: self.province,
            selection: self.selection.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub province: Province,
    #[serde(default)]
    pub selection: Selection,
}
