//! Parse-Driver
//!
//! Treibt die Zustandsmaschine und liefert pro Aufruf genau ein
//! Request-Teil. Der Aufrufer kann so zwischen zwei Teilen eigene Logik
//! ausführen (z.B. eine unbekannte Methode ablehnen, bevor der Rest des
//! Requests gelesen wird).

use super::reader::{Pending, TokenBuffer, perform};
use super::tables::{ParserState, RequestPart, next_state, state_properties};
use crate::traits::ByteStream;

/// Ergebnis eines `parse()`-Aufrufs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed<'b> {
    pub part: RequestPart,
    /// Dekodiertes Token (im Caller-Buffer NUL-terminiert)
    pub token: &'b [u8],
}

impl<'b> Parsed<'b> {
    const fn none() -> Self {
        Self {
            part: RequestPart::None,
            token: &[],
        }
    }

    /// Token als UTF-8, falls gültig
    pub fn token_str(&self) -> Option<&'b str> {
        core::str::from_utf8(self.token).ok()
    }
}

/// Inkrementeller HTTP-Request-Parser
///
/// Eine Instanz pro Request: startet in BEGIN, wird nach FINISHED oder
/// einem ERROR_*-Zustand verworfen und nie wiederverwendet.
///
/// # Beispiele
///
/// ```ignore
/// let mut parser = RequestParser::new(&mut stream);
/// let mut token = [0u8; 32];
/// loop {
///     let parsed = parser.parse(&mut token).await;
///     if parsed.part != RequestPart::None {
///         request.apply(parsed.part, parsed.token)?;
///     }
///     if parser.state().is_terminal() {
///         break;
///     }
/// }
/// ```
pub struct RequestParser<'s, S: ByteStream> {
    stream: &'s mut S,
    state: ParserState,
    /// Lone CR aus einem ReadIf-Zustand, gehört zum nächsten Token
    pending: Pending,
}

impl<'s, S: ByteStream> RequestParser<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        Self {
            stream,
            state: ParserState::Begin,
            pending: None,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Bricht den Request aus semantischen Gründen ab
    ///
    /// Für Teile, die syntaktisch korrekt, aber inhaltlich unzulässig sind
    /// (z.B. nicht unterstützte Methode). Ein bereits erreichter
    /// Endzustand bleibt erhalten.
    pub fn reject(&mut self) {
        if !self.state.is_terminal() {
            self.state = ParserState::ErrorRequestSemantics;
        }
    }

    /// Liest bis zum nächsten Request-Teil oder Endzustand
    ///
    /// `buffer` nimmt das Token auf (max. `buffer.len() - 1` Zeichen plus NUL).
    /// Ein leerer Buffer ist ein Aufruffehler und führt zu ERROR_INTERNAL.
    pub async fn parse<'b>(&mut self, buffer: &'b mut [u8]) -> Parsed<'b> {
        if self.state.is_terminal() {
            return Parsed::none();
        }
        if buffer.is_empty() {
            self.state = ParserState::ErrorInternal;
            return Parsed::none();
        }

        let (part, len) = loop {
            let Some(properties) = state_properties(self.state) else {
                self.state = ParserState::ErrorInternal;
                return Parsed::none();
            };

            let mut token = TokenBuffer::new(&mut *buffer);
            let event = perform(
                properties.op,
                &mut *self.stream,
                properties.control_set,
                &mut self.pending,
                &mut token,
            )
            .await;
            if properties.part.is_url_encoded() {
                token.url_decode();
            }
            let len = token.len();

            self.state = next_state(self.state, event, properties.default_transition);

            // Ein Token, das in einen Fehler führt, wird nicht ausgeliefert
            if properties.part != RequestPart::None && !self.state.is_error() {
                break (properties.part, len);
            }
            if self.state.is_terminal() {
                return Parsed::none();
            }
        };

        Parsed {
            part,
            token: &buffer[..len],
        }
    }
}
