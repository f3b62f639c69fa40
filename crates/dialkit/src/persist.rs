use crate::geometry::Offset;
use crate::ring::Slot;
use crate::storage::Storage;
use serde::de::DeserializeOwned;
use strum::{EnumIter, IntoStaticStr};

/// The three independently persisted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum PersistKey {
    #[strum(serialize = "faq.position")]
    Position,
    #[strum(serialize = "faq.description_open")]
    DescriptionOpen,
    #[strum(serialize = "faq.selected")]
    Selected,
}

impl PersistKey {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PersistedState {
    pub position: Offset,
    pub description_open: bool,
    pub selected: Slot,
}

impl PersistedState {
    /// Never fails: each entry falls back to its default on its own.
    pub fn load(storage: &dyn Storage) -> Self {
        let position = read::<Offset>(storage, PersistKey::Position)
            .filter(|p| p.is_finite())
            .unwrap_or_default();
        let description_open = read::<bool>(storage, PersistKey::DescriptionOpen).unwrap_or(false);
        let selected = read::<usize>(storage, PersistKey::Selected)
            .and_then(Slot::from_index)
            .unwrap_or_default();

        Self {
            position,
            description_open,
            selected,
        }
    }

    pub fn save_position(storage: &mut dyn Storage, position: Offset) {
        write(storage, PersistKey::Position, &position);
    }

    pub fn save_description_open(storage: &mut dyn Storage, open: bool) {
        write(storage, PersistKey::DescriptionOpen, &open);
    }

    pub fn save_selected(storage: &mut dyn Storage, slot: Slot) {
        write(storage, PersistKey::Selected, &slot.index());
    }
}

fn read<T: DeserializeOwned>(storage: &dyn Storage, key: PersistKey) -> Option<T> {
    let raw = match storage.get(key.as_str()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("Reading {} failed: {}", key.as_str(), e);
            return None;
        }
    };
    serde_json::from_str(&raw)
        .inspect_err(|e| log::debug!("Malformed {} ({:?}): {}", key.as_str(), raw, e))
        .ok()
}

fn write<T: serde::Serialize>(storage: &mut dyn Storage, key: PersistKey, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("Encoding {} failed: {}", key.as_str(), e);
            return;
        }
    };
    if let Err(e) = storage.set(key.as_str(), &raw) {
        log::debug!("Writing {} failed: {}", key.as_str(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_missing_entries_use_defaults() {
        let state = PersistedState::load(&MemoryStorage::new());
        assert_eq!(state, PersistedState::default());
        assert_eq!(state.selected, Slot::North);
    }

    #[test]
    fn test_malformed_entries_fall_back_individually() {
        let storage = MemoryStorage::new()
            .with("faq.position", "{\"x\": \"left\"}")
            .with("faq.description_open", "true")
            .with("faq.selected", "12");

        let state = PersistedState::load(&storage);
        assert_eq!(state.position, Point::ORIGIN);
        assert!(state.description_open);
        assert_eq!(state.selected, Slot::North);
    }

    #[test]
    fn test_unavailable_storage_reads_defaults_and_ignores_writes() {
        let mut storage = MemoryStorage::unavailable();
        PersistedState::save_selected(&mut storage, Slot::West);
        assert_eq!(PersistedState::load(&storage), PersistedState::default());
    }

    #[test]
    fn test_saved_values_load_back() {
        let mut storage = MemoryStorage::new();
        PersistedState::save_position(&mut storage, Point::new(-40.5, 12.0));
        PersistedState::save_description_open(&mut storage, true);
        PersistedState::save_selected(&mut storage, Slot::SouthWest);

        assert_eq!(
            storage.get("faq.selected").unwrap().as_deref(),
            Some("5")
        );
        let state = PersistedState::load(&storage);
        assert_eq!(state.position, Point::new(-40.5, 12.0));
        assert!(state.description_open);
        assert_eq!(state.selected, Slot::SouthWest);
    }
}
