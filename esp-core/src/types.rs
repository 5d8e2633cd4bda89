//! Core Types für den Umweltsensor
//!
//! Datenstrukturen ohne Hardware-Dependencies

use crate::http::ParserState;

/// Fehler-Typ für Sensor-Zugriffe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    ReadFailed,
    OutOfRange,
}

/// Fehler-Typ für den Settings-Speicher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Es wurden noch keine Settings gespeichert
    Empty,
    WriteFailed,
    Corrupted,
}

/// Gefilterter Messwert
///
/// Wird vom Sensor-Task erzeugt und von der Web-Oberfläche angezeigt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Reading {
    /// Temperatur in Hundertstel Grad Celsius
    pub centi_celsius: i32,
    /// Rohwert vor Filter und Offset
    pub raw_centi_celsius: i32,
    /// Zeitpunkt der Messung (Sekunden seit Boot)
    pub uptime_secs: u32,
}

impl Reading {
    /// Vorzeichen, ganzzahliger Anteil und zwei Nachkommastellen für die Anzeige
    pub fn split_celsius(&self) -> (bool, u32, u32) {
        split_centi(self.centi_celsius)
    }
}

/// Hundertstel in (negativ, ganze, Rest) zerlegen
///
/// Das Vorzeichen ist separat, sonst ginge es bei -0.05 verloren.
pub fn split_centi(centi: i32) -> (bool, u32, u32) {
    let abs = centi.unsigned_abs();
    (centi < 0, abs / 100, abs % 100)
}

/// HTTP-Statuscodes, die der Server verschickt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpStatus {
    Ok,
    SeeOther,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    ContentTooLarge,
    InternalServerError,
}

impl HttpStatus {
    pub fn code(self) -> u16 {
        match self {
            HttpStatus::Ok => 200,
            HttpStatus::SeeOther => 303,
            HttpStatus::BadRequest => 400,
            HttpStatus::NotFound => 404,
            HttpStatus::MethodNotAllowed => 405,
            HttpStatus::ContentTooLarge => 413,
            HttpStatus::InternalServerError => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            HttpStatus::Ok => "OK",
            HttpStatus::SeeOther => "See Other",
            HttpStatus::BadRequest => "Bad Request",
            HttpStatus::NotFound => "Not Found",
            HttpStatus::MethodNotAllowed => "Method Not Allowed",
            HttpStatus::ContentTooLarge => "Content Too Large",
            HttpStatus::InternalServerError => "Internal Server Error",
        }
    }

    /// Status für einen Parser-Endzustand
    ///
    /// `None` für FINISHED (die Route entscheidet) und für
    /// ERROR_REQUEST_SEMANTICS (der Consumer hat den Grund selbst gesetzt).
    pub fn for_parser_state(state: ParserState) -> Option<Self> {
        match state {
            ParserState::ErrorRequestStructure => Some(HttpStatus::BadRequest),
            ParserState::ErrorRequestPartTooLong => Some(HttpStatus::ContentTooLarge),
            ParserState::ErrorInternal => Some(HttpStatus::InternalServerError),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_client_errors() {
        assert_eq!(
            HttpStatus::for_parser_state(ParserState::ErrorRequestStructure),
            Some(HttpStatus::BadRequest)
        );
        assert_eq!(
            HttpStatus::for_parser_state(ParserState::ErrorRequestPartTooLong).map(HttpStatus::code),
            Some(413)
        );
    }

    #[test]
    fn test_status_for_finished_is_left_to_route() {
        assert_eq!(HttpStatus::for_parser_state(ParserState::Finished), None);
        assert_eq!(
            HttpStatus::for_parser_state(ParserState::ErrorRequestSemantics),
            None
        );
    }

    #[test]
    fn test_reading_split_negative() {
        let reading = Reading {
            centi_celsius: -5,
            raw_centi_celsius: -5,
            uptime_secs: 0,
        };
        assert_eq!(reading.split_celsius(), (true, 0, 5));
    }
}
