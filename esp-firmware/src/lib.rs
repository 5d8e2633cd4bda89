// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]
// Single-threaded Executor, Send-Bounds für Trait-Futures werden nicht gebraucht
#![allow(async_fn_in_trait)]

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Instant;
use heapless::Vec;

// Re-exports von esp-core
pub use esp_core::{
    DiagCounters, DiagEntry, DiagEvent, DiagnosticLog, Reading, SensorError, SensorSource,
    Settings, SettingsError, SettingsStore, StoreError,
};
use esp_core::request::PairList;

use crate::config::DIAG_LOG_CAPACITY;
use crate::hal::RamSettingsStore;

/// Diagnose-Log mit der konfigurierten Kapazität
pub type DiagLog = DiagnosticLog<DIAG_LOG_CAPACITY>;

/// Sekunden seit Boot
pub fn uptime_secs() -> u32 {
    u32::try_from(Instant::now().as_secs()).unwrap_or(u32::MAX)
}

/// Fehler beim Übernehmen neuer Settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SettingsUpdateError {
    /// Formular ungültig, nichts wurde geändert
    Invalid(SettingsError),
    /// Speichern fehlgeschlagen, alte Settings bleiben aktiv
    Store(StoreError),
}

/// Momentaufnahme für die Web-Oberfläche
pub struct NodeSnapshot {
    pub settings: Settings,
    pub reading: Option<Reading>,
    pub counters: DiagCounters,
    pub entries: Vec<DiagEntry, DIAG_LOG_CAPACITY>,
    pub uptime_secs: u32,
}

struct NodeData {
    settings: Settings,
    reading: Option<Reading>,
    diag: DiagLog,
    store: RamSettingsStore,
}

/// Gemeinsamer Zustand von Sensor- und HTTP-Tasks
///
/// Zugriffe sind kurz und blockieren nie über ein `.await` hinweg,
/// daher reicht ein blocking Mutex mit Critical Section.
pub struct NodeState {
    inner: Mutex<CriticalSectionRawMutex, RefCell<NodeData>>,
}

impl NodeState {
    pub fn new(settings: Settings, store: RamSettingsStore) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(NodeData {
                settings,
                reading: None,
                diag: DiagLog::new(),
                store,
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut NodeData) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn settings(&self) -> Settings {
        self.with(|data| data.settings.clone())
    }

    pub fn reading(&self) -> Option<Reading> {
        self.with(|data| data.reading)
    }

    pub fn set_reading(&self, reading: Reading) {
        self.with(|data| data.reading = Some(reading));
    }

    /// Protokolliert ein Ereignis mit aktuellem Zeitstempel
    pub fn record(&self, event: DiagEvent) {
        let now = uptime_secs();
        self.with(|data| data.diag.record(now, event));
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        let uptime_secs = uptime_secs();
        self.with(|data| NodeSnapshot {
            settings: data.settings.clone(),
            reading: data.reading,
            counters: data.diag.counters(),
            entries: data.diag.iter().copied().collect(),
            uptime_secs,
        })
    }

    /// Übernimmt ein Settings-Formular: erst prüfen, dann speichern, dann aktivieren
    pub fn update_settings<const N: usize>(
        &self,
        form: &PairList<N>,
    ) -> Result<Settings, SettingsUpdateError> {
        self.with(|data| {
            let updated = data
                .settings
                .with_form(form)
                .map_err(SettingsUpdateError::Invalid)?;
            data.store
                .save(&updated)
                .map_err(SettingsUpdateError::Store)?;
            data.settings = updated.clone();
            Ok(updated)
        })
    }
}
