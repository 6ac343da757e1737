//! JSON save slots on disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HistoriaError, Result};
use crate::simulation::{
    AchievementBook, Countries, CurrencyManager, DebtLedger, EspionageManager, GameSettings,
    LeaderRoster, ScriptedEvents, Timeline, TradeLedger, WorldBlocs, WorldClock,
};

pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Full copy of every mutable resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub settings: GameSettings,
    pub clock: WorldClock,
    pub countries: Countries,
    pub espionage: EspionageManager,
    pub currencies: CurrencyManager,
    pub debts: DebtLedger,
    pub blocs: WorldBlocs,
    pub trade: TradeLedger,
    pub timeline: Timeline,
    pub achievements: AchievementBook,
    pub leaders: LeaderRoster,
    pub scripted: ScriptedEvents,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveSlotInfo {
    pub slot: String,
    pub year: i32,
    pub month: u8,
    pub player: String,
    pub scenario: String,
}

/// Only the header fields, so listing skips the bulk of each file.
#[derive(Deserialize)]
struct SaveHeader {
    version: u32,
    settings: GameSettings,
    clock: WorldClock,
}

pub fn validate_slot(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && slot.len() <= 64
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(HistoriaError::invalid(format!(
            "invalid save slot '{slot}': use 1-64 letters, digits, '_' or '-'"
        )))
    }
}

#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, slot: &str) -> Result<PathBuf> {
        validate_slot(slot)?;
        Ok(self.dir.join(format!("{slot}.json")))
    }

    pub fn save(&self, slot: &str, game: &SaveGame) -> Result<PathBuf> {
        let path = self.path_for(slot)?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(game)?;
        fs::write(&path, json)?;
        info!(slot, path = %path.display(), "game saved");
        Ok(path)
    }

    pub fn load(&self, slot: &str) -> Result<SaveGame> {
        let path = self.path_for(slot)?;
        if !path.is_file() {
            return Err(HistoriaError::SaveNotFound(slot.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        let header: SaveHeader = serde_json::from_str(&raw)?;
        if header.version != SAVE_FORMAT_VERSION {
            return Err(HistoriaError::IncompatibleSave {
                expected: SAVE_FORMAT_VERSION,
                found: header.version,
            });
        }
        let game: SaveGame = serde_json::from_str(&raw)?;
        info!(slot, year = game.clock.year, month = game.clock.month, "game loaded");
        Ok(game)
    }

    pub fn delete(&self, slot: &str) -> Result<()> {
        let path = self.path_for(slot)?;
        if !path.is_file() {
            return Err(HistoriaError::SaveNotFound(slot.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    /// Readable slots sorted by name; unreadable files are skipped.
    pub fn list(&self) -> Result<Vec<SaveSlotInfo>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut slots = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Some(slot) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if validate_slot(slot).is_err() {
                continue;
            }
            let Ok(raw) = fs::read_to_string(&path) else {
                continue;
            };
            let Ok(header) = serde_json::from_str::<SaveHeader>(&raw) else {
                continue;
            };
            slots.push(SaveSlotInfo {
                slot: slot.to_string(),
                year: header.clock.year,
                month: header.clock.month,
                player: header.settings.player.to_string(),
                scenario: header.settings.scenario_id,
            });
        }
        slots.sort_by(|a, b| a.slot.cmp(&b.slot));
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::CountryId;

    fn game(year: i32) -> SaveGame {
        SaveGame {
            version: SAVE_FORMAT_VERSION,
            settings: GameSettings {
                scenario_id: "modern_2025".into(),
                player: CountryId::new("FRA"),
            },
            clock: WorldClock::new(year, 4),
            countries: Countries::default(),
            espionage: EspionageManager::default(),
            currencies: CurrencyManager::default(),
            debts: DebtLedger::default(),
            blocs: WorldBlocs::default(),
            trade: TradeLedger::default(),
            timeline: Timeline::default(),
            achievements: AchievementBook::default(),
            leaders: LeaderRoster::default(),
            scripted: ScriptedEvents::default(),
        }
    }

    #[test]
    fn test_slot_names() {
        assert!(validate_slot("autosave_2025-01").is_ok());
        assert!(validate_slot("").is_err());
        assert!(validate_slot("../escape").is_err());
        assert!(validate_slot(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_save_list_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("saves"));
        assert!(store.list().unwrap().is_empty());

        store.save("beta", &game(2030)).unwrap();
        store.save("alpha", &game(2026)).unwrap();
        std::fs::write(dir.path().join("saves").join("junk.json"), "{not json").unwrap();

        let slots = store.list().unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].slot, "alpha");
        assert_eq!(slots[1].year, 2030);
        assert_eq!(slots[1].player, "FRA");

        let loaded = store.load("beta").unwrap();
        assert_eq!(loaded.clock.year, 2030);
        assert_eq!(loaded.achievements.definitions().len(), 13);

        store.delete("beta").unwrap();
        assert!(matches!(store.load("beta"), Err(HistoriaError::SaveNotFound(_))));
        assert!(matches!(store.delete("beta"), Err(HistoriaError::SaveNotFound(_))));
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SaveStore::new(dir.path());
        let mut old = game(2025);
        old.version = 0;
        store.save("old", &old).unwrap();
        assert!(matches!(
            store.load("old"),
            Err(HistoriaError::IncompatibleSave { expected: 1, found: 0 })
        ));
    }
}
