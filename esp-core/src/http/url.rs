//! URL-Dekodierung
//!
//! `+` → Leerzeichen, `%XX` → Byte. Ungültige Escapes werden unverändert
//! übernommen. Die Ausgabe ist nie länger als die Eingabe, daher kann
//! in-place ohne Hilfsbuffer geschrieben werden.

/// Hex-Ziffer → Wert
fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Dekodiert `buf[..len]` in-place und liefert die neue Länge
///
/// Ist nach dem Ergebnis noch Platz im Buffer, wird NUL-terminiert.
///
/// # Beispiele
///
/// ```
/// # use esp_core::http::url_decode;
/// let mut buf = *b"/a%20b+c\0";
/// let len = url_decode(&mut buf, 8);
/// assert_eq!(&buf[..len], b"/a b c");
/// assert_eq!(buf[len], 0);
/// ```
pub fn url_decode(buf: &mut [u8], len: usize) -> usize {
    let len = len.min(buf.len());
    let mut read = 0;
    let mut write = 0;

    while read < len {
        let byte = buf[read];
        let decoded = match byte {
            b'+' => {
                read += 1;
                b' '
            }
            b'%' if read + 2 < len => {
                match (hex_value(buf[read + 1]), hex_value(buf[read + 2])) {
                    (Some(high), Some(low)) => {
                        read += 3;
                        high << 4 | low
                    }
                    _ => {
                        read += 1;
                        b'%'
                    }
                }
            }
            _ => {
                read += 1;
                byte
            }
        };
        buf[write] = decoded;
        write += 1;
    }

    if let Some(terminator) = buf.get_mut(write) {
        *terminator = 0;
    }
    write
}
