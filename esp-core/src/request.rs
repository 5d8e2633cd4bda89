//! Request-Modell
//!
//! Sammelt die vom Parser gelieferten Teile (Methode, Pfad, Query-,
//! Header- und Formular-Paare) und bestimmt die Route.

use heapless::{String, Vec};

use crate::http::{ParserState, RequestParser, RequestPart, TOKEN_BUFFER_SIZE};
use crate::traits::ByteStream;
use crate::types::HttpStatus;

/// Gespeichertes Token (max. 32 Bytes)
pub type Token = String<TOKEN_BUFFER_SIZE>;

pub const MAX_QUERY_PAIRS: usize = 4;
pub const MAX_HEADERS: usize = 8;
pub const MAX_FORM_PAIRS: usize = 8;

/// Unterstützte HTTP-Methoden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Method {
    Get,
    Head,
    Post,
}

impl Method {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Method::Get),
            "HEAD" => Some(Method::Head),
            "POST" => Some(Method::Post),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
        }
    }
}

/// Semantische Fehler beim Übernehmen eines Request-Teils
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    UnsupportedMethod,
    UnsupportedVersion,
    /// Token ist kein gültiges UTF-8
    InvalidEncoding,
    TokenTooLong,
}

impl RequestError {
    pub fn status(self) -> HttpStatus {
        match self {
            RequestError::UnsupportedMethod => HttpStatus::MethodNotAllowed,
            RequestError::TokenTooLong => HttpStatus::ContentTooLarge,
            RequestError::UnsupportedVersion | RequestError::InvalidEncoding => {
                HttpStatus::BadRequest
            }
        }
    }
}

/// Name/Wert-Paar
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pair {
    pub name: Token,
    pub value: Token,
}

/// Begrenzte Liste von Paaren
///
/// Ist die Liste voll, werden weitere Paare gezählt und verworfen;
/// ein Wert wird nur dem direkt vorher gelesenen Namen zugeordnet.
#[derive(Debug, Clone, Default)]
pub struct PairList<const N: usize> {
    pairs: Vec<Pair, N>,
    dropped: u16,
    awaiting_value: bool,
}

impl<const N: usize> PairList<N> {
    pub fn new() -> Self {
        Self {
            pairs: Vec::new(),
            dropped: 0,
            awaiting_value: false,
        }
    }

    fn push_name(&mut self, name: &str) -> Result<(), RequestError> {
        self.awaiting_value = false;
        let pair = Pair {
            name: to_token(name)?,
            value: Token::new(),
        };
        self.awaiting_value = self.pairs.push(pair).is_ok();
        if !self.awaiting_value {
            self.dropped = self.dropped.saturating_add(1);
        }
        Ok(())
    }

    fn set_value(&mut self, value: &str) -> Result<(), RequestError> {
        if !self.awaiting_value {
            return Ok(());
        }
        self.awaiting_value = false;
        if let Some(last) = self.pairs.last_mut() {
            last.value = to_token(value)?;
        }
        Ok(())
    }

    /// Verwirft das zuletzt begonnene Paar
    fn drop_last(&mut self) {
        self.awaiting_value = false;
        if self.pairs.pop().is_some() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }

    fn note_dropped(&mut self) {
        self.awaiting_value = false;
        self.dropped = self.dropped.saturating_add(1);
    }

    /// Erster Wert zu `name` (exakter Vergleich)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|pair| pair.name.as_str() == name)
            .map(|pair| pair.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Anzahl verworfener Paare (Liste war voll)
    pub fn dropped(&self) -> u16 {
        self.dropped
    }
}

fn to_token(text: &str) -> Result<Token, RequestError> {
    let mut token = Token::new();
    token
        .push_str(text)
        .map_err(|_| RequestError::TokenTooLong)?;
    Ok(token)
}

/// Vom Parser aufgebautes Request-Modell
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: Option<Method>,
    pub path: Token,
    pub version: Token,
    pub query: PairList<MAX_QUERY_PAIRS>,
    pub headers: PairList<MAX_HEADERS>,
    pub form: PairList<MAX_FORM_PAIRS>,
}

impl HttpRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Übernimmt ein Request-Teil
    ///
    /// Bei `Err` sollte der Aufrufer den Parser mit `reject()` abbrechen.
    /// Von Header-Werten wird nur der erste Teil (vor `;`) gespeichert;
    /// Header, die nicht in ein [`Token`] passen, werden verworfen und
    /// gezählt statt den Request abzulehnen.
    pub fn apply(&mut self, part: RequestPart, token: &[u8]) -> Result<(), RequestError> {
        let text = core::str::from_utf8(token).map_err(|_| RequestError::InvalidEncoding)?;
        match part {
            RequestPart::None | RequestPart::FieldValuePart2 => {}
            RequestPart::Method => {
                let method = Method::from_token(text).ok_or(RequestError::UnsupportedMethod)?;
                self.method = Some(method);
            }
            RequestPart::Path => self.path = to_token(text)?,
            RequestPart::HttpVersion => {
                if !text.starts_with("HTTP/1.") {
                    return Err(RequestError::UnsupportedVersion);
                }
                self.version = to_token(text)?;
            }
            RequestPart::UrlQueryName => self.query.push_name(text)?,
            RequestPart::UrlQueryValue => self.query.set_value(text)?,
            RequestPart::FieldName => {
                if self.headers.push_name(text).is_err() {
                    self.headers.note_dropped();
                }
            }
            RequestPart::FieldValuePart1 => {
                if self.headers.set_value(text).is_err() {
                    self.headers.drop_last();
                }
            }
            RequestPart::PostQueryName => self.form.push_name(text)?,
            RequestPart::PostQueryValue => self.form.set_value(text)?,
        }
        Ok(())
    }

    /// Header-Wert, Name ohne Beachtung der Groß-/Kleinschreibung
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|pair| pair.name.eq_ignore_ascii_case(name))
            .map(|pair| pair.value.as_str())
    }
}

/// Endpunkte der Web-Oberfläche
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// `GET /` - Diagnose- und Konfigurationsseite
    Index,
    /// `GET /status.json`
    StatusJson,
    /// `POST /settings` - Formular aus der Index-Seite
    UpdateSettings,
    NotFound,
    MethodNotAllowed,
}

impl Route {
    pub fn resolve(request: &HttpRequest) -> Self {
        let read_only = matches!(request.method, Some(Method::Get | Method::Head));
        match request.path.as_str() {
            "/" | "/index.html" if read_only => Route::Index,
            "/status.json" if read_only => Route::StatusJson,
            "/settings" if request.method == Some(Method::Post) => Route::UpdateSettings,
            "/" | "/index.html" | "/status.json" | "/settings" => Route::MethodNotAllowed,
            _ => Route::NotFound,
        }
    }
}

/// Ergebnis von [`read_request`]
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    /// Parser hat FINISHED erreicht
    Complete(HttpRequest),
    /// Ein Teil wurde abgelehnt, der Rest des Requests nicht gelesen
    Rejected(RequestError),
    /// Parser endete in einem Fehlerzustand
    Failed(ParserState),
    /// Stream endete ohne ein einziges Byte (z.B. Browser-Preconnect)
    Idle,
}

impl RequestOutcome {
    /// Status für die Fehlerantwort
    ///
    /// `None` bei vollständigem Request und bei einer Verbindung ohne Daten,
    /// die ohne Antwort geschlossen wird.
    pub fn error_status(&self) -> Option<HttpStatus> {
        match self {
            RequestOutcome::Complete(_) | RequestOutcome::Idle => None,
            RequestOutcome::Rejected(error) => Some(error.status()),
            RequestOutcome::Failed(state) => {
                Some(HttpStatus::for_parser_state(*state).unwrap_or(HttpStatus::InternalServerError))
            }
        }
    }
}

/// Liest einen kompletten Request aus `stream`
///
/// `B` ist die Größe des Token-Buffers. Jeder gelieferte Teil wird sofort
/// übernommen; schlägt das fehl, wird der Parser per `reject()` beendet.
pub async fn read_request<S: ByteStream, const B: usize>(stream: &mut S) -> RequestOutcome {
    let mut stream = Tracked {
        inner: stream,
        consumed: false,
    };
    let mut parser = RequestParser::new(&mut stream);
    let mut token = [0u8; B];
    let mut request = HttpRequest::new();

    let failed = loop {
        let parsed = parser.parse(&mut token).await;
        if parsed.part != RequestPart::None {
            if let Err(error) = request.apply(parsed.part, parsed.token) {
                parser.reject();
                return RequestOutcome::Rejected(error);
            }
        }
        match parser.state() {
            ParserState::Finished => return RequestOutcome::Complete(request),
            state if state.is_terminal() => break state,
            _ => {}
        }
    };

    if failed == ParserState::ErrorRequestStructure && !stream.consumed {
        RequestOutcome::Idle
    } else {
        RequestOutcome::Failed(failed)
    }
}

/// Merkt sich, ob überhaupt ein Byte gelesen wurde
struct Tracked<'a, S: ByteStream> {
    inner: &'a mut S,
    consumed: bool,
}

impl<S: ByteStream> ByteStream for Tracked<'_, S> {
    async fn read(&mut self) -> Option<u8> {
        let byte = self.inner.read().await;
        self.consumed |= byte.is_some();
        byte
    }

    async fn peek(&mut self) -> Option<u8> {
        self.inner.peek().await
    }
}
