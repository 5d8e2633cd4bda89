//! HTTP Request-Parser
//!
//! Tabellengesteuerte Zustandsmaschine, die Bytes inkrementell aus einem
//! [`ByteStream`](crate::traits::ByteStream) konsumiert und strukturierte
//! Request-Teile liefert, ohne je den ganzen Request zu puffern.
//!
//! Datenfluss: Driver → Reader → URL-Decoder → Tabellen → Driver

pub mod control;
pub mod parser;
pub mod reader;
pub mod tables;
pub mod url;

pub use control::{ControlCharacter, ControlCharacterSet};
pub use parser::{Parsed, RequestParser};
pub use reader::{StreamOp, TokenBuffer};
pub use tables::{ParserState, RequestPart, next_state, state_properties};
pub use url::url_decode;

/// Token-Buffer-Größe der Referenz-Hardware (31 Zeichen + NUL)
pub const TOKEN_BUFFER_SIZE: usize = 32;
