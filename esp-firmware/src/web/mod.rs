// Web-Modul für den HTTP Server
// Antwort-Köpfe, HTML-Seite und JSON-Status

pub mod pages;
pub mod protocol;
pub mod response;

pub use pages::write_index;
pub use protocol::{status_report, write_status_json};
pub use response::{APPLICATION_JSON, ResponseHead, TEXT_HTML, TEXT_PLAIN, write_text};
