// On-Chip Temperatursensor (TSENS) des ESP32-C6
//
// Misst die Chip-Temperatur, nicht die Umgebung. Der Offset aus den
// Settings gleicht die Eigenerwärmung aus.

use esp_hal::tsens::{Config, TemperatureSensor};

use esp_core::{SensorError, SensorSource};

/// Real Hardware Sensor
pub struct ChipTemperatureSensor<'d> {
    sensor: TemperatureSensor<'d>,
}

impl<'d> ChipTemperatureSensor<'d> {
    /// Initialisiert TSENS mit Default-Konfiguration
    ///
    /// # Fehlerbehandlung
    /// Gibt `SensorError::ReadFailed` zurück wenn die Konfiguration
    /// abgelehnt wird
    pub fn new(tsens: esp_hal::peripherals::TSENS<'d>) -> Result<Self, SensorError> {
        let sensor =
            TemperatureSensor::new(tsens, Config::default()).map_err(|_| SensorError::ReadFailed)?;
        Ok(Self { sensor })
    }
}

impl SensorSource for ChipTemperatureSensor<'_> {
    fn read_centi_celsius(&mut self) -> Result<i32, SensorError> {
        let celsius = self.sensor.get_temperature().to_celsius();
        if !celsius.is_finite() {
            return Err(SensorError::ReadFailed);
        }
        // kaufmännisch runden, core hat kein f32::round()
        let centi = celsius * 100.0;
        let rounded = if centi >= 0.0 { centi + 0.5 } else { centi - 0.5 };
        Ok(rounded as i32)
    }
}
