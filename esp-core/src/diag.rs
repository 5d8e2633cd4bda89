//! Diagnose-Log
//!
//! Ringpuffer der letzten N Ereignisse plus laufende Zähler. Wird von der
//! Web-Oberfläche und `/status.json` angezeigt.

use heapless::Deque;

use crate::http::ParserState;

/// Protokolliertes Ereignis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiagEvent {
    Boot,
    WifiConnected,
    WifiDisconnected,
    /// Antwort verschickt (HTTP-Statuscode)
    RequestServed(u16),
    /// Fehlerhafter Request (ERROR_REQUEST_*)
    ClientError(ParserState),
    /// Parser- oder Aufruffehler (ERROR_INTERNAL)
    InternalFault,
    SettingsSaved,
    SettingsRejected,
    SensorFault,
}

impl DiagEvent {
    pub fn label(&self) -> &'static str {
        match self {
            DiagEvent::Boot => "boot",
            DiagEvent::WifiConnected => "wifi connected",
            DiagEvent::WifiDisconnected => "wifi disconnected",
            DiagEvent::RequestServed(_) => "request served",
            DiagEvent::ClientError(ParserState::ErrorRequestPartTooLong) => "request part too long",
            DiagEvent::ClientError(ParserState::ErrorRequestSemantics) => "request rejected",
            DiagEvent::ClientError(_) => "malformed request",
            DiagEvent::InternalFault => "internal parser fault",
            DiagEvent::SettingsSaved => "settings saved",
            DiagEvent::SettingsRejected => "settings rejected",
            DiagEvent::SensorFault => "sensor fault",
        }
    }
}

/// Eintrag mit Zeitstempel (Sekunden seit Boot)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagEntry {
    pub uptime_secs: u32,
    pub event: DiagEvent,
}

/// Laufende Zähler seit Boot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiagCounters {
    pub requests_served: u32,
    pub client_errors: u32,
    pub internal_faults: u32,
    pub sensor_faults: u32,
}

pub struct DiagnosticLog<const N: usize> {
    entries: Deque<DiagEntry, N>,
    total: u32,
    counters: DiagCounters,
}

impl<const N: usize> DiagnosticLog<N> {
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            total: 0,
            counters: DiagCounters {
                requests_served: 0,
                client_errors: 0,
                internal_faults: 0,
                sensor_faults: 0,
            },
        }
    }

    /// Fügt einen Eintrag hinzu; bei vollem Puffer fällt der älteste raus
    pub fn record(&mut self, uptime_secs: u32, event: DiagEvent) {
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        let _ = self.entries.push_back(DiagEntry { uptime_secs, event });
        self.total = self.total.wrapping_add(1);

        let counters = &mut self.counters;
        match event {
            DiagEvent::RequestServed(_) => {
                counters.requests_served = counters.requests_served.wrapping_add(1)
            }
            DiagEvent::ClientError(_) => {
                counters.client_errors = counters.client_errors.wrapping_add(1)
            }
            DiagEvent::InternalFault => {
                counters.internal_faults = counters.internal_faults.wrapping_add(1)
            }
            DiagEvent::SensorFault => {
                counters.sensor_faults = counters.sensor_faults.wrapping_add(1)
            }
            _ => {}
        }
    }

    /// Einträge vom ältesten zum neuesten
    pub fn iter(&self) -> impl Iterator<Item = &DiagEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&DiagEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Anzahl aller jemals protokollierten Einträge
    pub fn total_recorded(&self) -> u32 {
        self.total
    }

    pub fn counters(&self) -> DiagCounters {
        self.counters
    }
}

impl<const N: usize> Default for DiagnosticLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_keeps_newest() {
        let mut log: DiagnosticLog<2> = DiagnosticLog::new();
        log.record(1, DiagEvent::Boot);
        log.record(2, DiagEvent::WifiConnected);
        log.record(3, DiagEvent::SettingsSaved);

        assert_eq!(log.len(), 2);
        assert_eq!(log.total_recorded(), 3);
        let mut iter = log.iter();
        assert_eq!(iter.next().map(|e| e.uptime_secs), Some(2));
        assert_eq!(iter.next().map(|e| e.event), Some(DiagEvent::SettingsSaved));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_counters_separate_client_and_internal() {
        let mut log: DiagnosticLog<4> = DiagnosticLog::new();
        log.record(0, DiagEvent::ClientError(ParserState::ErrorRequestStructure));
        log.record(0, DiagEvent::InternalFault);
        log.record(0, DiagEvent::RequestServed(200));

        let counters = log.counters();
        assert_eq!(counters.client_errors, 1);
        assert_eq!(counters.internal_faults, 1);
        assert_eq!(counters.requests_served, 1);
    }
}
