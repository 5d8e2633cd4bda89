//! JSON-Status für `/status.json`
//!
//! Nur das Datenmodell; serialisiert wird in der Firmware mit
//! serde-json-core in einen Buffer fester Größe.

use serde::Serialize;

use crate::diag::{DiagCounters, DiagEvent};
use crate::settings::Settings;
use crate::types::Reading;

/// Buffer-Größe für den serialisierten Status
///
/// Der ungünstigste Fall (voller Node-Name, gesättigte Zähler, längstes
/// Ereignis-Label) muss hineinpassen, sonst antwortet `/status.json` mit 500.
pub const STATUS_JSON_BUFFER_SIZE: usize = 512;

/// Antwort von /status.json
///
/// `reading` ist `null` bis zur ersten gültigen Messung.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport<'a> {
    pub uptime_secs: u32,
    pub reading: Option<Reading>,
    pub settings: &'a Settings,
    pub counters: DiagCounters,
    pub last_event: Option<&'static str>,
}

impl<'a> StatusReport<'a> {
    pub fn new(
        uptime_secs: u32,
        reading: Option<Reading>,
        settings: &'a Settings,
        counters: DiagCounters,
        last_event: Option<DiagEvent>,
    ) -> Self {
        Self {
            uptime_secs,
            reading,
            settings,
            counters,
            last_event: last_event.map(|event| event.label()),
        }
    }
}
