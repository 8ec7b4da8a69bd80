//! Mock/live data-mode selection
//!
//! The selected mode is read every time a query or mutation is issued and
//! persisted on every change. Switching never touches requests that are
//! already running; they finish against the source they started on.

use crate::error::{ImsError, Result};
use crate::storage::{KeyValueStore, DATA_MODE_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Where data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    /// In-memory fixtures with simulated latency
    #[default]
    Mock,
    /// Networked REST API
    Live,
}

impl DataMode {
    /// Persisted / display name
    pub fn as_str(&self) -> &'static str {
        match self {
            DataMode::Mock => "mock",
            DataMode::Live => "live",
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            DataMode::Mock => DataMode::Live,
            DataMode::Live => DataMode::Mock,
        }
    }

    /// Mode implied by the "enable mock data" build flag
    pub fn from_mock_flag(enable_mock_data: bool) -> Self {
        if enable_mock_data {
            DataMode::Mock
        } else {
            DataMode::Live
        }
    }
}

impl fmt::Display for DataMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataMode {
    type Err = ImsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" | "demo" => Ok(DataMode::Mock),
            // "api" is what older state files contain
            "live" | "api" => Ok(DataMode::Live),
            _ => Err(ImsError::unknown("data mode", s)),
        }
    }
}

/// Indicator label for a mode
pub fn indicator_text(mode: DataMode) -> &'static str {
    match mode {
        DataMode::Mock => "Demo Mode",
        DataMode::Live => "Live Mode",
    }
}

/// Indicator text color token for a mode
pub fn indicator_color(mode: DataMode) -> &'static str {
    match mode {
        DataMode::Mock => "text-orange-600",
        DataMode::Live => "text-green-600",
    }
}

/// Indicator background color token for a mode
pub fn indicator_bg_color(mode: DataMode) -> &'static str {
    match mode {
        DataMode::Mock => "bg-orange-100",
        DataMode::Live => "bg-green-100",
    }
}

/// Persisted data-mode switch
pub struct ModeSwitch {
    store: Arc<dyn KeyValueStore>,
    mode: RwLock<DataMode>,
}

impl ModeSwitch {
    /// Load the mode from `store`.
    ///
    /// Precedence: persisted value, then `build_default`, then [`DataMode::Mock`].
    /// An unparseable persisted value counts as absent.
    pub fn load(store: Arc<dyn KeyValueStore>, build_default: Option<DataMode>) -> Self {
        let persisted = store.get(DATA_MODE_KEY).and_then(|raw| match raw.parse() {
            Ok(mode) => Some(mode),
            Err(_) => {
                tracing::warn!("Ignoring invalid persisted data mode '{}'", raw);
                None
            }
        });

        let mode = persisted.or(build_default).unwrap_or_default();
        tracing::debug!("Data mode initialised to {}", mode);

        Self {
            store,
            mode: RwLock::new(mode),
        }
    }

    /// Current mode
    pub fn mode(&self) -> DataMode {
        self.mode.read().map(|m| *m).unwrap_or_default()
    }

    /// Whether mock mode is active
    pub fn is_mock(&self) -> bool {
        self.mode() == DataMode::Mock
    }

    /// Whether live mode is active
    pub fn is_live(&self) -> bool {
        self.mode() == DataMode::Live
    }

    /// Select `mode` and persist it. The mode is unchanged when saving fails.
    pub fn set_mode(&self, mode: DataMode) -> Result<()> {
        let mut current = self
            .mode
            .write()
            .map_err(|_| ImsError::config("data mode lock poisoned"))?;
        self.store.set(DATA_MODE_KEY, mode.as_str())?;
        if *current != mode {
            tracing::info!("Data mode changed: {} -> {}", *current, mode);
        }
        *current = mode;
        Ok(())
    }

    /// Flip between mock and live, returning the new mode
    pub fn toggle_mode(&self) -> Result<DataMode> {
        let next = self.mode().toggled();
        self.set_mode(next)?;
        Ok(next)
    }
}

impl fmt::Debug for ModeSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeSwitch").field("mode", &self.mode()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    /// Readable store that refuses every write
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&self, key: &str, _value: &str) -> Result<()> {
            Err(ImsError::io(
                key,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_save_keeps_previous_mode() {
        let switch = ModeSwitch::load(Arc::new(ReadOnlyStore), None);
        assert_eq!(switch.mode(), DataMode::Mock);

        assert!(switch.set_mode(DataMode::Live).is_err());
        assert_eq!(switch.mode(), DataMode::Mock);

        assert!(switch.toggle_mode().is_err());
        assert!(switch.is_mock());
    }

    #[test]
    fn test_defaults_to_mock() {
        let switch = ModeSwitch::load(Arc::new(MemoryStore::new()), None);
        assert_eq!(switch.mode(), DataMode::Mock);
        assert!(switch.is_mock());
    }

    #[test]
    fn test_initialisation_precedence() {
        let persisted = MemoryStore::with_entries([(DATA_MODE_KEY, "mock")]);
        let switch = ModeSwitch::load(Arc::new(persisted), Some(DataMode::Live));
        assert_eq!(switch.mode(), DataMode::Mock);

        let switch = ModeSwitch::load(Arc::new(MemoryStore::new()), Some(DataMode::Live));
        assert_eq!(switch.mode(), DataMode::Live);

        let invalid = MemoryStore::with_entries([(DATA_MODE_KEY, "offline")]);
        let switch = ModeSwitch::load(Arc::new(invalid), None);
        assert_eq!(switch.mode(), DataMode::Mock);
    }

    #[test]
    fn test_legacy_api_value_means_live() {
        let legacy = MemoryStore::with_entries([(DATA_MODE_KEY, "api")]);
        let switch = ModeSwitch::load(Arc::new(legacy), None);
        assert!(switch.is_live());
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        for mode in [DataMode::Live, DataMode::Mock, DataMode::Live] {
            let store = Arc::new(FileStore::open(&path).unwrap());
            ModeSwitch::load(store, None).set_mode(mode).unwrap();

            let reloaded = ModeSwitch::load(Arc::new(FileStore::open(&path).unwrap()), None);
            assert_eq!(reloaded.mode(), mode);
        }
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let switch = ModeSwitch::load(Arc::new(MemoryStore::new()), None);
        let original = switch.mode();
        assert_eq!(switch.toggle_mode().unwrap(), DataMode::Live);
        switch.toggle_mode().unwrap();
        assert_eq!(switch.mode(), original);
    }

    #[test]
    fn test_indicator_helpers() {
        assert_eq!(indicator_text(DataMode::Mock), "Demo Mode");
        assert_eq!(indicator_text(DataMode::Live), "Live Mode");
        assert_eq!(indicator_color(DataMode::Mock), "text-orange-600");
        assert_eq!(indicator_bg_color(DataMode::Live), "bg-green-100");
    }

    #[test]
    fn test_mock_flag() {
        assert_eq!(DataMode::from_mock_flag(true), DataMode::Mock);
        assert_eq!(DataMode::from_mock_flag(false), DataMode::Live);
    }
}
