// HTTP-Antworten: Status-Zeile und Header
//
// Jede Antwort schließt die Verbindung (Connection: close), ein Body ohne
// Content-Length endet mit dem Schließen des Sockets.

use core::fmt::Write as _;
use embedded_io_async::Write;
use heapless::String;

use esp_core::HttpStatus;

use crate::config::HTTP_HEAD_BUFFER_SIZE;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";

/// Kopf einer Antwort
pub struct ResponseHead<'a> {
    status: HttpStatus,
    content_type: &'a str,
    content_length: Option<usize>,
    location: Option<&'a str>,
    allow: Option<&'a str>,
}

impl<'a> ResponseHead<'a> {
    pub fn new(status: HttpStatus, content_type: &'a str) -> Self {
        Self {
            status,
            content_type,
            content_length: None,
            location: None,
            allow: None,
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.content_length = Some(length);
        self
    }

    pub fn with_location(mut self, location: &'a str) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_allow(mut self, methods: &'a str) -> Self {
        self.allow = Some(methods);
        self
    }

    pub fn status(&self) -> HttpStatus {
        self.status
    }

    pub async fn write_to<W: Write>(&self, w: &mut W) -> Result<(), W::Error> {
        let mut head: String<HTTP_HEAD_BUFFER_SIZE> = String::new();
        let _ = write!(
            head,
            "HTTP/1.1 {} {}\r\n\
             Content-Type: {}\r\n\
             Cache-Control: no-store\r\n\
             Connection: close\r\n",
            self.status.code(),
            self.status.reason(),
            self.content_type,
        );
        if let Some(length) = self.content_length {
            let _ = write!(head, "Content-Length: {}\r\n", length);
        }
        if let Some(location) = self.location {
            let _ = write!(head, "Location: {}\r\n", location);
        }
        if let Some(allow) = self.allow {
            let _ = write!(head, "Allow: {}\r\n", allow);
        }
        let _ = head.push_str("\r\n");
        w.write_all(head.as_bytes()).await
    }
}

/// Kurze Text-Antwort, z.B. für Fehler
pub async fn write_text<W: Write>(
    w: &mut W,
    head: ResponseHead<'_>,
    body: &str,
    head_only: bool,
) -> Result<(), W::Error> {
    head.with_length(body.len()).write_to(w).await?;
    if !head_only {
        w.write_all(body.as_bytes()).await?;
    }
    Ok(())
}
