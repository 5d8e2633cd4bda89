//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Netzwerk-, Sensor- und
//! Speicher-Zugriff ohne konkrete Implementierung.

use crate::settings::Settings;
use crate::types::{SensorError, StoreError};

/// Byte-orientierter Eingabe-Stream (z.B. TCP-Socket)
///
/// Liefert einzelne Bytes an den HTTP-Parser. `None` bedeutet
/// "kein Byte verfügbar" (Stream-Ende oder Timeout) - was das heißt,
/// entscheidet der Parser anhand seines aktuellen Zustands.
///
/// # Implementierungen
/// - **Production:** SocketStream (embassy-net TcpSocket)
/// - **Testing:** MockStream (in-memory Byte-Slice)
pub trait ByteStream {
    /// Konsumiert ein Byte
    async fn read(&mut self) -> Option<u8>;

    /// Liefert das nächste Byte, ohne es zu konsumieren
    async fn peek(&mut self) -> Option<u8>;
}

/// Trait für Temperatur-Sensoren
///
/// # Implementierungen
/// - **Production:** ChipTemperatureSensor (ESP32-C6 TSENS)
/// - **Testing:** MockSensor
pub trait SensorSource {
    /// Liest einen Messwert in Hundertstel Grad Celsius
    fn read_centi_celsius(&mut self) -> Result<i32, SensorError>;
}

/// Trait für persistente Konfiguration
pub trait SettingsStore {
    /// Lädt gespeicherte Settings
    ///
    /// # Fehlerbehandlung
    /// Gibt `StoreError::Empty` zurück wenn noch nie gespeichert wurde
    fn load(&mut self) -> Result<Settings, StoreError>;

    /// Speichert Settings
    fn save(&mut self, settings: &Settings) -> Result<(), StoreError>;
}
