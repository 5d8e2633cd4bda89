// Settings-Speicher im RAM
//
// Hält die zuletzt gespeicherten Settings bis zum nächsten Reset.

use esp_core::{Settings, SettingsStore, StoreError};

// TODO: Flash-Backend über esp-storage (NVS-Partition), damit Settings einen Reset überleben
#[derive(Default)]
pub struct RamSettingsStore {
    slot: Option<Settings>,
}

impl RamSettingsStore {
    pub const fn new() -> Self {
        Self { slot: None }
    }
}

impl SettingsStore for RamSettingsStore {
    fn load(&mut self) -> Result<Settings, StoreError> {
        self.slot.clone().ok_or(StoreError::Empty)
    }

    fn save(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.slot = Some(settings.clone());
        Ok(())
    }
}
