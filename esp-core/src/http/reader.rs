//! Stream Reader
//!
//! Liest Bytes aus einem [`ByteStream`] und liefert klassifizierte
//! Ereignisse. Es wird nie ein Byte zurückgeschoben; nur
//! [`read_if_control_character`] arbeitet nicht-konsumierend.

use super::control::{ControlCharacter, ControlCharacterSet};
use super::url::url_decode;
use crate::traits::ByteStream;

/// Stream-Operation, die ein Zustand verlangt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamOp {
    /// Kein Stream-Zugriff, nur der Default-Übergang greift
    None,
    Read,
    ReadIfControlCharacter,
    ReadUntilControlCharacter,
    SkipUntilControlCharacter,
}

/// Begrenzter Token-Buffer über einem Caller-Buffer
///
/// Hält maximal `buf.len() - 1` Zeichen und ist immer NUL-terminiert.
pub struct TokenBuffer<'a> {
    buf: &'a mut [u8],
    len: usize,
    overflowed: bool,
}

impl<'a> TokenBuffer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        if let Some(first) = buf.first_mut() {
            *first = 0;
        }
        Self {
            buf,
            len: 0,
            overflowed: false,
        }
    }

    /// Nutzbare Zeichen (ohne NUL)
    pub fn capacity(&self) -> usize {
        self.buf.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Wurde mindestens ein Byte verworfen, weil der Buffer voll war?
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
        if let Some(first) = self.buf.first_mut() {
            *first = 0;
        }
    }

    fn push(&mut self, byte: u8) {
        if self.len < self.capacity() {
            self.buf[self.len] = byte;
            self.len += 1;
            self.buf[self.len] = 0;
        } else {
            self.overflowed = true;
        }
    }

    /// URL-Dekodierung in-place
    pub fn url_decode(&mut self) {
        self.len = url_decode(self.buf, self.len);
    }
}

/// Ein bereits konsumiertes Byte, das noch zum nächsten Token gehört
///
/// Entsteht, wenn [`read_if_control_character`] ein CR liest und kein LF
/// folgt. Der Parser hält den Slot über Zustandswechsel hinweg.
pub type Pending = Option<u8>;

/// Liest genau ein Ereignis (1-2 Bytes) und liefert das Roh-Byte mit
async fn next_event<S: ByteStream>(
    stream: &mut S,
    set: ControlCharacterSet,
    pending: &mut Pending,
) -> (ControlCharacter, u8) {
    // Ein übertragenes CR ist schon als Inhalt klassifiziert
    if let Some(byte) = pending.take() {
        return (ControlCharacter::Other, byte);
    }
    let Some(byte) = stream.read().await else {
        return (ControlCharacter::Unavailable, 0);
    };
    if byte == b'\r' {
        return (complete_crlf(stream, set).await, byte);
    }
    (set.classify(byte), byte)
}

/// CR ist schon konsumiert: LF wird nur per peek() geprüft,
/// damit ein fremdes Folgebyte im Stream bleibt
async fn complete_crlf<S: ByteStream>(
    stream: &mut S,
    set: ControlCharacterSet,
) -> ControlCharacter {
    if set.contains(ControlCharacter::Crlf) && stream.peek().await == Some(b'\n') {
        let _ = stream.read().await;
        ControlCharacter::Crlf
    } else {
        ControlCharacter::Other
    }
}

/// Klassifiziert genau ein Ereignis
pub async fn read<S: ByteStream>(
    stream: &mut S,
    set: ControlCharacterSet,
    pending: &mut Pending,
) -> ControlCharacter {
    next_event(stream, set, pending).await.0
}

/// Konsumiert nur, wenn das nächste Byte ein Steuerzeichen ist
///
/// Ein CR ohne folgendes LF ist Inhalt: es landet in `pending` und wird
/// vom nächsten Lesezugriff als erstes Byte geliefert.
pub async fn read_if_control_character<S: ByteStream>(
    stream: &mut S,
    set: ControlCharacterSet,
    pending: &mut Pending,
) -> ControlCharacter {
    if pending.is_some() {
        return ControlCharacter::Other;
    }
    let Some(byte) = stream.peek().await else {
        return ControlCharacter::Unavailable;
    };
    if byte == b'\r' {
        if !set.contains(ControlCharacter::Crlf) {
            return ControlCharacter::Other;
        }
        let _ = stream.read().await;
        let event = complete_crlf(stream, set).await;
        if event == ControlCharacter::Other {
            *pending = Some(byte);
        }
        return event;
    }
    let event = set.classify(byte);
    if event != ControlCharacter::Other {
        let _ = stream.read().await;
    }
    event
}

/// Sammelt Inhalts-Bytes in `token` bis zum nächsten Steuerzeichen
///
/// Ist der Buffer voll, wird weitergelesen und verworfen. Das Ergebnis
/// ist dann `Other` statt des abschließenden Ereignisses.
pub async fn read_until_control_character<S: ByteStream>(
    stream: &mut S,
    set: ControlCharacterSet,
    pending: &mut Pending,
    token: &mut TokenBuffer<'_>,
) -> ControlCharacter {
    token.clear();
    loop {
        let (event, byte) = next_event(stream, set, pending).await;
        if event != ControlCharacter::Other {
            return if token.overflowed() {
                ControlCharacter::Other
            } else {
                event
            };
        }
        if token.is_empty() && set.skips_leading_blanks() && matches!(byte, b' ' | b'\t') {
            continue;
        }
        token.push(byte);
    }
}

/// Wie [`read_until_control_character`], aber ohne Token
pub async fn skip_until_control_character<S: ByteStream>(
    stream: &mut S,
    set: ControlCharacterSet,
    pending: &mut Pending,
) -> ControlCharacter {
    loop {
        let (event, _) = next_event(stream, set, pending).await;
        if event != ControlCharacter::Other {
            return event;
        }
    }
}

/// Führt die Operation eines Zustands aus
pub async fn perform<S: ByteStream>(
    op: StreamOp,
    stream: &mut S,
    set: ControlCharacterSet,
    pending: &mut Pending,
    token: &mut TokenBuffer<'_>,
) -> ControlCharacter {
    match op {
        StreamOp::None => ControlCharacter::Other,
        StreamOp::Read => read(stream, set, pending).await,
        StreamOp::ReadIfControlCharacter => read_if_control_character(stream, set, pending).await,
        StreamOp::ReadUntilControlCharacter => {
            read_until_control_character(stream, set, pending, token).await
        }
        StreamOp::SkipUntilControlCharacter => {
            skip_until_control_character(stream, set, pending).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    struct SliceStream<'a> {
        data: &'a [u8],
        pos: usize,
    }

    impl<'a> SliceStream<'a> {
        fn new(data: &'a [u8]) -> Self {
            Self { data, pos: 0 }
        }

        fn remaining(&self) -> &'a [u8] {
            &self.data[self.pos..]
        }
    }

    impl ByteStream for SliceStream<'_> {
        async fn read(&mut self) -> Option<u8> {
            let byte = self.data.get(self.pos).copied()?;
            self.pos += 1;
            Some(byte)
        }

        async fn peek(&mut self) -> Option<u8> {
            self.data.get(self.pos).copied()
        }
    }

    #[test]
    fn test_read_until_stops_at_space() {
        let mut stream = SliceStream::new(b"GET /");
        let mut buf = [0xffu8; 8];
        let mut token = TokenBuffer::new(&mut buf);
        let event = block_on(read_until_control_character(
            &mut stream,
            ControlCharacterSet::Core,
            &mut None,
            &mut token,
        ));
        assert_eq!(event, ControlCharacter::Space);
        assert_eq!(token.as_bytes(), b"GET");
        assert_eq!(stream.remaining(), b"/");
        assert_eq!(buf[3], 0);
    }

    #[test]
    fn test_read_until_overflow_drains_and_reports_other() {
        let mut stream = SliceStream::new(b"ABCDEFGH rest");
        let mut buf = [0u8; 4];
        let mut token = TokenBuffer::new(&mut buf);
        let event = block_on(read_until_control_character(
            &mut stream,
            ControlCharacterSet::Core,
            &mut None,
            &mut token,
        ));
        assert_eq!(event, ControlCharacter::Other);
        assert!(token.overflowed());
        assert_eq!(token.as_bytes(), b"ABC");
        assert_eq!(stream.remaining(), b"rest");
    }

    #[test]
    fn test_lone_cr_is_content_and_keeps_next_byte() {
        let mut stream = SliceStream::new(b"a\rb\r\n");
        let mut buf = [0u8; 8];
        let mut token = TokenBuffer::new(&mut buf);
        let event = block_on(read_until_control_character(
            &mut stream,
            ControlCharacterSet::Core,
            &mut None,
            &mut token,
        ));
        assert_eq!(event, ControlCharacter::Crlf);
        assert_eq!(token.as_bytes(), b"a\rb");
    }

    #[test]
    fn test_read_if_control_character_leaves_content() {
        let mut stream = SliceStream::new(b"Host");
        let event = block_on(read_if_control_character(
            &mut stream,
            ControlCharacterSet::FieldName,
            &mut None,
        ));
        assert_eq!(event, ControlCharacter::Other);
        assert_eq!(stream.remaining(), b"Host");
    }

    #[test]
    fn test_read_if_control_character_consumes_crlf() {
        let mut stream = SliceStream::new(b"\r\nbody");
        let event = block_on(read_if_control_character(
            &mut stream,
            ControlCharacterSet::FieldName,
            &mut None,
        ));
        assert_eq!(event, ControlCharacter::Crlf);
        assert_eq!(stream.remaining(), b"body");
    }

    #[test]
    fn test_empty_stream_is_unavailable() {
        let mut stream = SliceStream::new(b"");
        assert_eq!(
            block_on(read(&mut stream, ControlCharacterSet::Core, &mut None)),
            ControlCharacter::Unavailable
        );
        assert_eq!(
            block_on(read_if_control_character(
                &mut stream,
                ControlCharacterSet::Body,
                &mut None,
            )),
            ControlCharacter::Unavailable
        );
    }

    #[test]
    fn test_skip_until_discards_content() {
        let mut stream = SliceStream::new(b"ignored: yes\r\nnext");
        let event = block_on(skip_until_control_character(
            &mut stream,
            ControlCharacterSet::Core,
            &mut None,
        ));
        assert_eq!(event, ControlCharacter::Space);
        assert_eq!(stream.remaining(), b"yes\r\nnext");
    }

    #[test]
    fn test_field_value_skips_leading_blanks() {
        let mut stream = SliceStream::new(b" \ttext/html;");
        let mut buf = [0u8; 16];
        let mut token = TokenBuffer::new(&mut buf);
        let event = block_on(read_until_control_character(
            &mut stream,
            ControlCharacterSet::FieldValue,
            &mut None,
            &mut token,
        ));
        assert_eq!(event, ControlCharacter::Semicolon);
        assert_eq!(token.as_bytes(), b"text/html");
    }

    #[test]
    fn test_read_if_lone_cr_is_carried_into_next_token() {
        let mut stream = SliceStream::new(b"\rX: y");
        let mut pending = None;
        let event = block_on(read_if_control_character(
            &mut stream,
            ControlCharacterSet::FieldName,
            &mut pending,
        ));
        assert_eq!(event, ControlCharacter::Other);
        assert_eq!(pending, Some(b'\r'));
        assert_eq!(stream.remaining(), b"X: y");

        let mut buf = [0u8; 8];
        let mut token = TokenBuffer::new(&mut buf);
        let event = block_on(read_until_control_character(
            &mut stream,
            ControlCharacterSet::FieldName,
            &mut pending,
            &mut token,
        ));
        assert_eq!(event, ControlCharacter::Colon);
        assert_eq!(token.as_bytes(), b"\rX");
        assert_eq!(pending, None);
    }

    #[test]
    fn test_read_if_leaves_pending_byte_alone() {
        let mut stream = SliceStream::new(b"\r\n");
        let mut pending = Some(b'\r');
        let event = block_on(read_if_control_character(
            &mut stream,
            ControlCharacterSet::Body,
            &mut pending,
        ));
        assert_eq!(event, ControlCharacter::Other);
        assert_eq!(pending, Some(b'\r'));
        assert_eq!(stream.remaining(), b"\r\n");
    }
}
