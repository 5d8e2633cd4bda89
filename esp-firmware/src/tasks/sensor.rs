// Sensor Task - Misst periodisch die Temperatur
use defmt::{error, info, warn};
use embassy_time::{Duration, Timer};

use esp_core::{DiagEvent, ExponentialFilter, SensorSource, measure};

use crate::config::SENSOR_WARMUP_MS;
use crate::hal::ChipTemperatureSensor;
use crate::{NodeState, uptime_secs};

/// Sensor Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// - Liest den Sensor im Intervall aus den aktuellen Settings
/// - Plausibilisiert, kalibriert und filtert den Rohwert
/// - Legt das Ergebnis im gemeinsamen Zustand ab
///
/// Settings werden vor jeder Messung neu gelesen, Änderungen über die
/// Web-Oberfläche greifen also ab dem nächsten Zyklus.
pub async fn sensor_logic<S: SensorSource>(mut sensor: S, state: &'static NodeState) -> ! {
    let mut filter = ExponentialFilter::new(state.settings().smoothing_shift);
    Timer::after(Duration::from_millis(SENSOR_WARMUP_MS)).await;

    loop {
        let settings = state.settings();
        match measure(&mut sensor, &mut filter, &settings, uptime_secs()) {
            Ok(reading) => {
                info!(
                    "Sensor: {} (raw {}) x0.01 degC",
                    reading.centi_celsius, reading.raw_centi_celsius
                );
                state.set_reading(reading);
            }
            Err(e) => {
                warn!("Sensor: Measurement failed: {}", e);
                state.record(DiagEvent::SensorFault);
            }
        }

        Timer::after(Duration::from_secs(u64::from(settings.sample_interval_secs))).await;
    }
}

/// Sensor Task - Embassy Task für parallele Ausführung
///
/// Initialisiert TSENS und ruft dann `sensor_logic()` auf.
#[embassy_executor::task]
pub async fn sensor_task(tsens: esp_hal::peripherals::TSENS<'static>, state: &'static NodeState) {
    match ChipTemperatureSensor::new(tsens) {
        Ok(sensor) => sensor_logic(sensor, state).await,
        Err(e) => {
            error!("Sensor: Initialization failed: {}", e);
            state.record(DiagEvent::SensorFault);
        }
    }
}
