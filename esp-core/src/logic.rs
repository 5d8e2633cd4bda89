//! Pure Business Logic Functions
//!
//! Festkomma-Filter für Messwerte (ohne Hardware-Dependencies, testbar!)

use core::ops::RangeInclusive;

use crate::settings::{MAX_SMOOTHING_SHIFT, Settings};
use crate::traits::SensorSource;
use crate::types::{Reading, SensorError};

/// Plausibler Messbereich des Chip-Sensors (-40 °C bis 125 °C)
pub const VALID_RANGE_CENTI: RangeInclusive<i32> = -4000..=12500;

/// Nachkomma-Bits des Filter-Akkumulators
const FRACTION_BITS: u32 = 8;

/// Exponentieller gleitender Mittelwert in Festkomma
///
/// `y += (x - y) / 2^shift`; `shift = 0` reicht den Messwert durch.
///
/// # Beispiele
///
/// ```
/// # use esp_core::ExponentialFilter;
/// let mut filter = ExponentialFilter::new(2);
/// assert_eq!(filter.update(2000), 2000); // erster Wert übernimmt direkt
/// assert_eq!(filter.update(2400), 2100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialFilter {
    shift: u8,
    acc: Option<i64>,
}

impl ExponentialFilter {
    pub fn new(shift: u8) -> Self {
        Self {
            shift: shift.min(MAX_SMOOTHING_SHIFT),
            acc: None,
        }
    }

    /// Ändert die Glättung, der aktuelle Wert bleibt erhalten
    pub fn set_shift(&mut self, shift: u8) {
        self.shift = shift.min(MAX_SMOOTHING_SHIFT);
    }

    pub fn shift(&self) -> u8 {
        self.shift
    }

    pub fn reset(&mut self) {
        self.acc = None;
    }

    pub fn value(&self) -> Option<i32> {
        self.acc.map(Self::round)
    }

    pub fn update(&mut self, sample: i32) -> i32 {
        let scaled = i64::from(sample) << FRACTION_BITS;
        let acc = match self.acc {
            None => scaled,
            Some(acc) => {
                let half = if self.shift == 0 {
                    0
                } else {
                    1 << (self.shift - 1)
                };
                acc + ((scaled - acc + half) >> self.shift)
            }
        };
        self.acc = Some(acc);
        Self::round(acc)
    }

    fn round(acc: i64) -> i32 {
        ((acc + (1 << (FRACTION_BITS - 1))) >> FRACTION_BITS) as i32
    }
}

/// Kalibriert und filtert einen Rohwert gemäß Settings
pub fn process_sample(filter: &mut ExponentialFilter, raw_centi: i32, settings: &Settings) -> i32 {
    if filter.shift() != settings.smoothing_shift {
        filter.set_shift(settings.smoothing_shift);
    }
    let calibrated = raw_centi.saturating_add(i32::from(settings.offset_centi_celsius));
    filter.update(calibrated)
}

/// Eine Messung: Sensor lesen, plausibilisieren, kalibrieren, filtern
///
/// Ein ungültiger Rohwert verändert den Filter nicht.
pub fn measure<S: SensorSource>(
    sensor: &mut S,
    filter: &mut ExponentialFilter,
    settings: &Settings,
    uptime_secs: u32,
) -> Result<Reading, SensorError> {
    let raw = sensor.read_centi_celsius()?;
    if !VALID_RANGE_CENTI.contains(&raw) {
        return Err(SensorError::OutOfRange);
    }
    Ok(Reading {
        centi_celsius: process_sample(filter, raw, settings),
        raw_centi_celsius: raw,
        uptime_secs,
    })
}
