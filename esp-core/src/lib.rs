//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert den HTTP-Parser, das Request-Modell, Traits und Pure Functions.

#![no_std]
// Single-threaded Executor, Send-Bounds für Trait-Futures werden nicht gebraucht
#![allow(async_fn_in_trait)]

pub mod diag;
pub mod http;
pub mod logic;
pub mod request;
pub mod settings;
#[cfg(feature = "serde")]
pub mod status;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use diag::{DiagCounters, DiagEntry, DiagEvent, DiagnosticLog};
pub use http::{ParserState, Parsed, RequestParser, RequestPart};
pub use logic::{ExponentialFilter, measure, process_sample};
pub use request::{HttpRequest, Method, RequestError, RequestOutcome, Route, read_request};
pub use settings::{Settings, SettingsError};
#[cfg(feature = "serde")]
pub use status::{STATUS_JSON_BUFFER_SIZE, StatusReport};
pub use traits::{ByteStream, SensorSource, SettingsStore};
pub use types::{HttpStatus, Reading, SensorError, StoreError};
