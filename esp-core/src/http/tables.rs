//! Zustands- und Übergangstabellen des Request-Parsers
//!
//! Die Grammatik steckt komplett in zwei statischen Tabellen:
//! - [`STATE_TABLE`]: was in einem Zustand gelesen wird
//! - [`TRANSITION_TABLE`]: wohin ein beobachtetes Ereignis führt
//!
//! Der Driver in `parser.rs` enthält keine Grammatik-Verzweigungen.

use super::control::{ControlCharacter, ControlCharacterSet};
use super::reader::StreamOp;

/// Position in der Request-Grammatik
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParserState {
    Begin,
    Method,
    Path,
    UrlQueryName,
    UrlQueryValue,
    HttpVersion,
    FieldOrHeaderEnd,
    FieldName,
    FieldValuePart1,
    FieldValuePart2,
    PostQueryOrEnd,
    PostQueryName,
    PostQueryValue,
    Finished,
    ErrorInternal,
    ErrorRequestPartTooLong,
    ErrorRequestStructure,
    ErrorRequestSemantics,
}

impl ParserState {
    /// Alle Zustände (für Vollständigkeits-Tests der Tabellen)
    pub const ALL: [ParserState; 18] = [
        ParserState::Begin,
        ParserState::Method,
        ParserState::Path,
        ParserState::UrlQueryName,
        ParserState::UrlQueryValue,
        ParserState::HttpVersion,
        ParserState::FieldOrHeaderEnd,
        ParserState::FieldName,
        ParserState::FieldValuePart1,
        ParserState::FieldValuePart2,
        ParserState::PostQueryOrEnd,
        ParserState::PostQueryName,
        ParserState::PostQueryValue,
        ParserState::Finished,
        ParserState::ErrorInternal,
        ParserState::ErrorRequestPartTooLong,
        ParserState::ErrorRequestStructure,
        ParserState::ErrorRequestSemantics,
    ];

    pub fn is_error(self) -> bool {
        matches!(
            self,
            ParserState::ErrorInternal
                | ParserState::ErrorRequestPartTooLong
                | ParserState::ErrorRequestStructure
                | ParserState::ErrorRequestSemantics
        )
    }

    /// FINISHED oder ERROR_*: absorbierend
    pub fn is_terminal(self) -> bool {
        self == ParserState::Finished || self.is_error()
    }
}

/// Logisches Feld, zu dem das zuletzt gelesene Token gehört
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestPart {
    None,
    Method,
    Path,
    UrlQueryName,
    UrlQueryValue,
    HttpVersion,
    FieldName,
    FieldValuePart1,
    FieldValuePart2,
    PostQueryName,
    PostQueryValue,
}

impl RequestPart {
    /// Teile, die URL-kodiert übertragen werden
    ///
    /// Methode, Version und Header-Felder werden roh weitergereicht.
    pub fn is_url_encoded(self) -> bool {
        matches!(
            self,
            RequestPart::Path
                | RequestPart::UrlQueryName
                | RequestPart::UrlQueryValue
                | RequestPart::PostQueryName
                | RequestPart::PostQueryValue
        )
    }
}

/// Eigenschaften eines Zustands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTableEntry {
    pub state: ParserState,
    pub op: StreamOp,
    pub part: RequestPart,
    /// Ziel, wenn kein Eintrag in der Übergangstabelle passt
    pub default_transition: ParserState,
    pub control_set: ControlCharacterSet,
}

/// Übergang (Zustand, Ereignis) → neuer Zustand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTableEntry {
    pub state: ParserState,
    pub event: ControlCharacter,
    pub next: ParserState,
}

const fn entry(
    state: ParserState,
    op: StreamOp,
    part: RequestPart,
    default_transition: ParserState,
    control_set: ControlCharacterSet,
) -> StateTableEntry {
    StateTableEntry {
        state,
        op,
        part,
        default_transition,
        control_set,
    }
}

const fn edge(state: ParserState, event: ControlCharacter, next: ParserState) -> TransitionTableEntry {
    TransitionTableEntry { state, event, next }
}

use self::ParserState as S;
use self::RequestPart as P;
use super::control::ControlCharacter as C;
use super::control::ControlCharacterSet as Set;

#[rustfmt::skip]
pub static STATE_TABLE: [StateTableEntry; 18] = [
    entry(S::Begin, StreamOp::None, P::None, S::Method, Set::Core),
    entry(S::Method, StreamOp::ReadUntilControlCharacter, P::Method, S::ErrorRequestStructure, Set::Core),
    entry(S::Path, StreamOp::ReadUntilControlCharacter, P::Path, S::ErrorRequestStructure, Set::Path),
    entry(S::UrlQueryName, StreamOp::ReadUntilControlCharacter, P::UrlQueryName, S::ErrorRequestStructure, Set::Query),
    entry(S::UrlQueryValue, StreamOp::ReadUntilControlCharacter, P::UrlQueryValue, S::ErrorRequestStructure, Set::Query),
    entry(S::HttpVersion, StreamOp::ReadUntilControlCharacter, P::HttpVersion, S::ErrorRequestStructure, Set::Core),
    entry(S::FieldOrHeaderEnd, StreamOp::ReadIfControlCharacter, P::None, S::FieldName, Set::FieldName),
    entry(S::FieldName, StreamOp::ReadUntilControlCharacter, P::FieldName, S::ErrorRequestStructure, Set::FieldName),
    entry(S::FieldValuePart1, StreamOp::ReadUntilControlCharacter, P::FieldValuePart1, S::ErrorRequestStructure, Set::FieldValue),
    entry(S::FieldValuePart2, StreamOp::ReadUntilControlCharacter, P::FieldValuePart2, S::ErrorRequestStructure, Set::FieldValue),
    entry(S::PostQueryOrEnd, StreamOp::ReadIfControlCharacter, P::None, S::PostQueryName, Set::Body),
    entry(S::PostQueryName, StreamOp::ReadUntilControlCharacter, P::PostQueryName, S::ErrorRequestStructure, Set::Body),
    entry(S::PostQueryValue, StreamOp::ReadUntilControlCharacter, P::PostQueryValue, S::ErrorRequestStructure, Set::Body),
    entry(S::Finished, StreamOp::None, P::None, S::Finished, Set::Core),
    entry(S::ErrorInternal, StreamOp::None, P::None, S::ErrorInternal, Set::Core),
    entry(S::ErrorRequestPartTooLong, StreamOp::None, P::None, S::ErrorRequestPartTooLong, Set::Core),
    entry(S::ErrorRequestStructure, StreamOp::None, P::None, S::ErrorRequestStructure, Set::Core),
    entry(S::ErrorRequestSemantics, StreamOp::None, P::None, S::ErrorRequestSemantics, Set::Core),
];

// `Other` nach einem ReadUntil bedeutet: Token zu lang.
#[rustfmt::skip]
pub static TRANSITION_TABLE: &[TransitionTableEntry] = &[
    // Request-Zeile
    edge(S::Method, C::Space, S::Path),
    edge(S::Method, C::Other, S::ErrorRequestPartTooLong),
    edge(S::Path, C::Question, S::UrlQueryName),
    edge(S::Path, C::Space, S::HttpVersion),
    edge(S::Path, C::Other, S::ErrorRequestPartTooLong),
    edge(S::UrlQueryName, C::Equal, S::UrlQueryValue),
    edge(S::UrlQueryName, C::Ampersand, S::UrlQueryName),
    edge(S::UrlQueryName, C::Space, S::HttpVersion),
    edge(S::UrlQueryName, C::Other, S::ErrorRequestPartTooLong),
    edge(S::UrlQueryValue, C::Ampersand, S::UrlQueryName),
    edge(S::UrlQueryValue, C::Space, S::HttpVersion),
    edge(S::UrlQueryValue, C::Other, S::ErrorRequestPartTooLong),
    edge(S::HttpVersion, C::Crlf, S::FieldOrHeaderEnd),
    edge(S::HttpVersion, C::Other, S::ErrorRequestPartTooLong),
    // Header
    edge(S::FieldOrHeaderEnd, C::Crlf, S::PostQueryOrEnd),
    edge(S::FieldOrHeaderEnd, C::Colon, S::FieldValuePart1),
    edge(S::FieldOrHeaderEnd, C::Unavailable, S::ErrorRequestStructure),
    edge(S::FieldName, C::Colon, S::FieldValuePart1),
    edge(S::FieldName, C::Other, S::ErrorRequestPartTooLong),
    edge(S::FieldValuePart1, C::Crlf, S::FieldOrHeaderEnd),
    edge(S::FieldValuePart1, C::Equal, S::FieldValuePart2),
    edge(S::FieldValuePart1, C::Semicolon, S::FieldValuePart1),
    edge(S::FieldValuePart1, C::Other, S::ErrorRequestPartTooLong),
    edge(S::FieldValuePart2, C::Crlf, S::FieldOrHeaderEnd),
    edge(S::FieldValuePart2, C::Semicolon, S::FieldValuePart1),
    edge(S::FieldValuePart2, C::Equal, S::FieldValuePart2),
    edge(S::FieldValuePart2, C::Other, S::ErrorRequestPartTooLong),
    // Body
    edge(S::PostQueryOrEnd, C::Unavailable, S::Finished),
    edge(S::PostQueryOrEnd, C::Crlf, S::Finished),
    edge(S::PostQueryOrEnd, C::Equal, S::PostQueryValue),
    edge(S::PostQueryName, C::Equal, S::PostQueryValue),
    edge(S::PostQueryName, C::Ampersand, S::PostQueryName),
    edge(S::PostQueryName, C::Unavailable, S::Finished),
    edge(S::PostQueryName, C::Crlf, S::Finished),
    edge(S::PostQueryName, C::Other, S::ErrorRequestPartTooLong),
    edge(S::PostQueryValue, C::Ampersand, S::PostQueryName),
    edge(S::PostQueryValue, C::Unavailable, S::Finished),
    edge(S::PostQueryValue, C::Crlf, S::Finished),
    edge(S::PostQueryValue, C::Other, S::ErrorRequestPartTooLong),
];

/// Eigenschaften eines Zustands (lineare Suche)
///
/// `None` ist ein Tabellen-Defekt und wird vom Driver als
/// ERROR_INTERNAL behandelt.
pub fn state_properties(state: ParserState) -> Option<&'static StateTableEntry> {
    STATE_TABLE.iter().find(|entry| entry.state == state)
}

/// Nächster Zustand; erster passender Eintrag gewinnt
pub fn next_state(
    state: ParserState,
    event: ControlCharacter,
    default_transition: ParserState,
) -> ParserState {
    TRANSITION_TABLE
        .iter()
        .find(|edge| edge.state == state && edge.event == event)
        .map_or(default_transition, |edge| edge.next)
}
