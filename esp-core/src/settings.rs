//! Laufzeit-Konfiguration des Sensorknotens
//!
//! Wird über das Formular der Web-Oberfläche (`POST /settings`) geändert
//! und über einen [`SettingsStore`](crate::traits::SettingsStore) persistiert.

use core::ops::RangeInclusive;
use heapless::String;

use crate::request::PairList;

pub const NODE_NAME_CAPACITY: usize = 24;
pub const SAMPLE_INTERVAL_RANGE: RangeInclusive<u16> = 1..=3600;
pub const MAX_SMOOTHING_SHIFT: u8 = 8;
/// Kalibrier-Offset in Hundertstel Grad (±10 °C)
pub const OFFSET_RANGE: RangeInclusive<i16> = -1000..=1000;

/// Fehler beim Übernehmen eines Formularfelds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    UnknownField,
    InvalidValue,
    OutOfRange,
    ValueTooLong,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
    pub node_name: String<NODE_NAME_CAPACITY>,
    pub sample_interval_secs: u16,
    /// Glättung des EMA-Filters (0 = ungefiltert)
    pub smoothing_shift: u8,
    pub offset_centi_celsius: i16,
}

impl Default for Settings {
    fn default() -> Self {
        let mut node_name = String::new();
        let _ = node_name.push_str("umweltsensor");
        Self {
            node_name,
            sample_interval_secs: 10,
            smoothing_shift: 3,
            offset_centi_celsius: 0,
        }
    }
}

impl Settings {
    /// Übernimmt ein einzelnes Formularfeld
    pub fn apply_field(&mut self, name: &str, value: &str) -> Result<(), SettingsError> {
        match name {
            "node_name" => {
                let valid = !value.is_empty()
                    && value
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b' '));
                if !valid {
                    return Err(SettingsError::InvalidValue);
                }
                let mut node_name = String::new();
                node_name
                    .push_str(value)
                    .map_err(|_| SettingsError::ValueTooLong)?;
                self.node_name = node_name;
            }
            "sample_interval" => {
                let secs: u16 = value.parse().map_err(|_| SettingsError::InvalidValue)?;
                if !SAMPLE_INTERVAL_RANGE.contains(&secs) {
                    return Err(SettingsError::OutOfRange);
                }
                self.sample_interval_secs = secs;
            }
            "smoothing" => {
                let shift: u8 = value.parse().map_err(|_| SettingsError::InvalidValue)?;
                if shift > MAX_SMOOTHING_SHIFT {
                    return Err(SettingsError::OutOfRange);
                }
                self.smoothing_shift = shift;
            }
            "offset" => {
                let offset: i16 = value.parse().map_err(|_| SettingsError::InvalidValue)?;
                if !OFFSET_RANGE.contains(&offset) {
                    return Err(SettingsError::OutOfRange);
                }
                self.offset_centi_celsius = offset;
            }
            _ => return Err(SettingsError::UnknownField),
        }
        Ok(())
    }

    /// Übernimmt alle Formularfelder oder keines
    ///
    /// Liefert die neuen Settings; `self` bleibt unverändert.
    pub fn with_form<const N: usize>(&self, form: &PairList<N>) -> Result<Settings, SettingsError> {
        let mut updated = self.clone();
        for pair in form.iter() {
            updated.apply_field(pair.name.as_str(), pair.value.as_str())?;
        }
        Ok(updated)
    }
}
