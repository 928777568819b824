//! Remembers the last province and selection between launches.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::app_state::PersistedState;

const APP_QUALIFIER: &str = "pk";
const APP_ORG: &str = "MandP";
const APP_NAME: &str = "IntlRates";
const STATE_FILE: &str = "selection.json";

#[derive(Debug, thiserror::Error)]
pub enum PersistSaveError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

fn data_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(STATE_FILE))
}

pub fn load_persisted_state() -> Option<PersistedState> {
    load_from(&data_file()?)
}

pub fn save_persisted_state(state: &PersistedState) -> Result<(), PersistSaveError> {
    let path = data_file().ok_or(PersistSaveError::StorageUnavailable)?;
    save_to(&path, state)
}

/// A missing or corrupt file reads as "nothing saved".
fn load_from(path: &Path) -> Option<PersistedState> {
    let data = fs::read_to_string(path)
        .map_err(|e| debug!("No saved state at {}: {e}", path.display()))
        .ok()?;
    serde_json::from_str(&data)
        .map_err(|e| warn!("Ignoring unreadable state file {}: {e}", path.display()))
        .ok()
}

fn save_to(path: &Path, state: &PersistedState) -> Result<(), PersistSaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(state)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Province, Selection, Weight};
    use pretty_assertions::assert_eq;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("intl-rates-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn saved_state_loads_back() {
        let path = scratch("roundtrip/selection.json");
        let state = PersistedState {
            province: Province::Punjab,
            selection: Selection::new("Oman", Weight::from_grams(2_500), Category::Pkg),
        };
        save_to(&path, &state).unwrap();
        assert_eq!(load_from(&path), Some(state));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let path = scratch("corrupt/selection.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_from(&path), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_none() {
        assert_eq!(load_from(&scratch("absent/selection.json")), None);
    }
}
