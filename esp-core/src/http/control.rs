//! Steuerzeichen-Klassifizierung
//!
//! Übersetzt rohe Bytes in das kleine Alphabet strukturell relevanter
//! Ereignisse, auf denen die Zustandstabellen arbeiten.

/// Klassifiziertes Ereignis aus dem Byte-Stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlCharacter {
    /// Stream erschöpft (Ende oder Timeout)
    Unavailable,
    /// CR direkt gefolgt von LF
    Crlf,
    Space,
    Question,
    Ampersand,
    Equal,
    Colon,
    Semicolon,
    /// Gewöhnliches Inhalts-Byte
    ///
    /// Bei `read_until_control_character` bedeutet `Other` als Ergebnis,
    /// dass das Token nicht in den Buffer gepasst hat.
    Other,
}

impl ControlCharacter {
    const fn bit(self) -> u8 {
        match self {
            ControlCharacter::Unavailable | ControlCharacter::Other => 0,
            ControlCharacter::Crlf => 1 << 0,
            ControlCharacter::Space => 1 << 1,
            ControlCharacter::Question => 1 << 2,
            ControlCharacter::Ampersand => 1 << 3,
            ControlCharacter::Equal => 1 << 4,
            ControlCharacter::Colon => 1 << 5,
            ControlCharacter::Semicolon => 1 << 6,
        }
    }

    /// Einzelbyte-Kandidat (ohne CR, das braucht das Folgebyte)
    const fn from_punctuation(byte: u8) -> Self {
        match byte {
            b' ' => ControlCharacter::Space,
            b'?' => ControlCharacter::Question,
            b'&' => ControlCharacter::Ampersand,
            b'=' => ControlCharacter::Equal,
            b':' => ControlCharacter::Colon,
            b';' => ControlCharacter::Semicolon,
            _ => ControlCharacter::Other,
        }
    }
}

/// Welche Steuerzeichen im aktuellen Zustand strukturell sind
///
/// Alles, was nicht im Set ist, zählt als Inhalt (`Other`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlCharacterSet {
    /// CRLF und Leerzeichen (Methode, HTTP-Version)
    Core,
    /// Core + `?`
    Path,
    /// Core + `&` und `=`
    Query,
    /// CRLF und `:`
    FieldName,
    /// CRLF, `;` und `=`; führende Leerzeichen werden übersprungen
    FieldValue,
    /// CRLF, `&` und `=`
    Body,
}

impl ControlCharacterSet {
    const fn mask(self) -> u8 {
        let crlf = ControlCharacter::Crlf.bit();
        match self {
            ControlCharacterSet::Core => crlf | ControlCharacter::Space.bit(),
            ControlCharacterSet::Path => {
                crlf | ControlCharacter::Space.bit() | ControlCharacter::Question.bit()
            }
            ControlCharacterSet::Query => {
                crlf | ControlCharacter::Space.bit()
                    | ControlCharacter::Ampersand.bit()
                    | ControlCharacter::Equal.bit()
            }
            ControlCharacterSet::FieldName => crlf | ControlCharacter::Colon.bit(),
            ControlCharacterSet::FieldValue => {
                crlf | ControlCharacter::Semicolon.bit() | ControlCharacter::Equal.bit()
            }
            ControlCharacterSet::Body => {
                crlf | ControlCharacter::Ampersand.bit() | ControlCharacter::Equal.bit()
            }
        }
    }

    /// Ist das Ereignis in diesem Set strukturell?
    ///
    /// `Unavailable` ist immer relevant, `Other` nie.
    pub const fn contains(self, event: ControlCharacter) -> bool {
        match event {
            ControlCharacter::Unavailable => true,
            ControlCharacter::Other => false,
            _ => self.mask() & event.bit() != 0,
        }
    }

    /// Klassifiziert ein einzelnes Byte (CR wird vom Reader behandelt)
    pub const fn classify(self, byte: u8) -> ControlCharacter {
        let candidate = ControlCharacter::from_punctuation(byte);
        if self.contains(candidate) {
            candidate
        } else {
            ControlCharacter::Other
        }
    }

    /// Werden führende Leerzeichen/Tabs eines Tokens verworfen?
    pub const fn skips_leading_blanks(self) -> bool {
        matches!(self, ControlCharacterSet::FieldValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_core_set() {
        let set = ControlCharacterSet::Core;
        assert_eq!(set.classify(b' '), ControlCharacter::Space);
        assert_eq!(set.classify(b'?'), ControlCharacter::Other);
        assert_eq!(set.classify(b'G'), ControlCharacter::Other);
    }

    #[test]
    fn test_classify_query_set() {
        let set = ControlCharacterSet::Query;
        assert_eq!(set.classify(b'&'), ControlCharacter::Ampersand);
        assert_eq!(set.classify(b'='), ControlCharacter::Equal);
        assert_eq!(set.classify(b':'), ControlCharacter::Other);
    }

    #[test]
    fn test_field_value_keeps_colon_and_space_as_content() {
        // "Host: 192.168.4.1:80" - der Doppelpunkt gehört zum Wert
        let set = ControlCharacterSet::FieldValue;
        assert_eq!(set.classify(b':'), ControlCharacter::Other);
        assert_eq!(set.classify(b' '), ControlCharacter::Other);
        assert_eq!(set.classify(b';'), ControlCharacter::Semicolon);
        assert_eq!(set.classify(b'='), ControlCharacter::Equal);
        assert!(set.skips_leading_blanks());
    }

    #[test]
    fn test_every_set_contains_crlf_and_unavailable() {
        for set in [
            ControlCharacterSet::Core,
            ControlCharacterSet::Path,
            ControlCharacterSet::Query,
            ControlCharacterSet::FieldName,
            ControlCharacterSet::FieldValue,
            ControlCharacterSet::Body,
        ] {
            assert!(set.contains(ControlCharacter::Crlf));
            assert!(set.contains(ControlCharacter::Unavailable));
            assert!(!set.contains(ControlCharacter::Other));
        }
    }
}
