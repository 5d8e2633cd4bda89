// Projekt-Konfiguration: Konstanten für WiFi, HTTP und Sensor
#![allow(dead_code)]

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach fehlgeschlagenem Verbindungsversuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// Knoten-Konfiguration
// ============================================================================

/// Knoten-Name beim ersten Start, optional aus NODE_NAME (.env)
pub const DEFAULT_NODE_NAME: Option<&str> = option_env!("NODE_NAME");

/// Anzahl Einträge im Diagnose-Log
pub const DIAG_LOG_CAPACITY: usize = 16;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

pub const HTTP_PORT: u16 = 80;

/// Anzahl paralleler Server-Tasks (je eine Connection)
pub const HTTP_SERVER_TASKS: usize = 2;

/// Token-Buffer des Parsers
/// Größer als esp_core::http::TOKEN_BUFFER_SIZE, weil Browser lange
/// Header-Werte schicken (User-Agent, Accept). Pfad, Query und Formular
/// bleiben über das Request-Modell auf 32 Bytes begrenzt.
pub const HTTP_TOKEN_BUFFER_SIZE: usize = 128;

/// Wartezeit auf das erste Byte eines Requests nach accept()
pub const HTTP_FIRST_BYTE_TIMEOUT_MS: u64 = 2000;

/// Lesefenster innerhalb eines Requests
/// Kommt in dieser Zeit kein Byte, meldet der Stream "nicht verfügbar".
/// Ein POST-Body ohne abschließendes CRLF endet so.
pub const HTTP_IDLE_TIMEOUT_MS: u64 = 200;

/// Socket-Timeout für Schreiben und hängende Verbindungen
pub const HTTP_SOCKET_TIMEOUT_SECS: u64 = 10;

/// Lese-Chunk des Socket-Adapters
pub const SOCKET_CHUNK_SIZE: usize = 64;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Buffer für Response-Header und einzelne HTML-Fragmente
pub const HTTP_HEAD_BUFFER_SIZE: usize = 256;

/// JSON Serialisierungs-Buffer für /status.json
pub const JSON_STATUS_BUFFER_SIZE: usize = esp_core::STATUS_JSON_BUFFER_SIZE;

// ============================================================================
// Sensor Konfiguration
// ============================================================================

/// Wartezeit bis zur ersten Messung (TSENS braucht etwas Einschwingzeit)
pub const SENSOR_WARMUP_MS: u64 = 500;
