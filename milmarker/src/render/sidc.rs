//! Minimal SIDC classification for the reference renderer.
//!
//! Only what the frame renderer needs is extracted: the encoding, the
//! standard identity folded into four frame families, and whether the
//! symbol is planned (dashed frame). Everything else in the code is passed
//! over.

use crate::error::{SymbolError, SymbolResult};
use crate::symbol::{CodeEncoding, SymbolCode};

/// Letter-coded SIDCs are 15 characters; shorter forms omit trailing fields.
const LETTER_MIN_LEN: usize = 10;
const LETTER_MAX_LEN: usize = 15;

/// Numeric SIDCs are 20 digits, optionally extended to 30.
const NUMERIC_LENGTHS: [usize; 2] = [20, 30];

/// Coding schemes of the letter-coded form.
const LETTER_SCHEMES: &str = "SGWIOE";

/// Frame family derived from the standard identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affiliation {
    Friend,
    Hostile,
    Neutral,
    Unknown,
}

impl Affiliation {
    /// Lowercase name for logging and markup classes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Affiliation::Friend => "friend",
            Affiliation::Hostile => "hostile",
            Affiliation::Neutral => "neutral",
            Affiliation::Unknown => "unknown",
        }
    }
}

/// What the frame renderer knows about a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidcInfo {
    pub encoding: CodeEncoding,
    pub affiliation: Affiliation,
    pub planned: bool,
}

/// Classify a code, rejecting malformed ones.
pub fn classify(code: &SymbolCode) -> SymbolResult<SidcInfo> {
    let raw = code.as_str();
    if raw.is_empty() {
        return Err(SymbolError::invalid_code(raw, "code is empty"));
    }
    match code.encoding() {
        CodeEncoding::Numeric => classify_numeric(raw),
        CodeEncoding::Letter => classify_letter(raw),
    }
}

fn classify_letter(raw: &str) -> SymbolResult<SidcInfo> {
    let upper = raw.to_ascii_uppercase();
    let bytes = upper.as_bytes();

    if !(LETTER_MIN_LEN..=LETTER_MAX_LEN).contains(&bytes.len()) {
        return Err(SymbolError::invalid_code(
            raw,
            format!(
                "letter-coded SIDC must be {}-{} characters, got {}",
                LETTER_MIN_LEN,
                LETTER_MAX_LEN,
                bytes.len()
            ),
        ));
    }

    if let Some(bad) = upper
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '*'))
    {
        return Err(SymbolError::invalid_code(
            raw,
            format!("unexpected character '{}'", bad),
        ));
    }

    let scheme = bytes[0] as char;
    if !LETTER_SCHEMES.contains(scheme) {
        return Err(SymbolError::invalid_code(
            raw,
            format!("unknown coding scheme '{}'", scheme),
        ));
    }

    let identity = bytes[1] as char;
    let affiliation = match identity {
        'F' | 'A' | 'D' | 'M' => Affiliation::Friend,
        'H' | 'S' | 'J' | 'K' => Affiliation::Hostile,
        'N' | 'L' => Affiliation::Neutral,
        'U' | 'P' | 'G' | 'W' | '-' | '*' => Affiliation::Unknown,
        // Weather symbols carry no standard identity.
        _ if scheme == 'W' => Affiliation::Unknown,
        other => {
            return Err(SymbolError::invalid_code(
                raw,
                format!("unknown standard identity '{}'", other),
            ))
        }
    };

    Ok(SidcInfo {
        encoding: CodeEncoding::Letter,
        affiliation,
        planned: bytes[3] == b'A',
    })
}

fn classify_numeric(raw: &str) -> SymbolResult<SidcInfo> {
    let bytes = raw.as_bytes();

    if !NUMERIC_LENGTHS.contains(&bytes.len()) {
        return Err(SymbolError::invalid_code(
            raw,
            format!("numeric SIDC must be 20 or 30 digits, got {}", bytes.len()),
        ));
    }

    if bytes[0] != b'1' {
        return Err(SymbolError::invalid_code(
            raw,
            format!("unsupported numeric version '{}'", &raw[..2]),
        ));
    }

    let affiliation = match bytes[3] {
        b'0' | b'1' => Affiliation::Unknown,
        b'2' | b'3' => Affiliation::Friend,
        b'4' => Affiliation::Neutral,
        b'5' | b'6' => Affiliation::Hostile,
        other => {
            return Err(SymbolError::invalid_code(
                raw,
                format!("unknown standard identity '{}'", other as char),
            ))
        }
    };

    Ok(SidcInfo {
        encoding: CodeEncoding::Numeric,
        affiliation,
        planned: bytes[6] == b'1',
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(code: &str) -> SymbolResult<SidcInfo> {
        classify(&SymbolCode::from(code))
    }

    #[test]
    fn test_letter_codes() {
        assert_eq!(info("SFGPEWRH--MT").unwrap().affiliation, Affiliation::Friend);
        assert_eq!(info("SHG-UCIZ---D").unwrap().affiliation, Affiliation::Hostile);
        assert_eq!(info("SNGPUCI----").unwrap().affiliation, Affiliation::Neutral);
        assert_eq!(info("SUGPUCI----").unwrap().affiliation, Affiliation::Unknown);
        assert!(!info("SFGPUCI----").unwrap().planned);
        assert!(info("SFGAUCI----").unwrap().planned);
    }

    #[test]
    fn test_lowercase_letter_code_accepted() {
        assert_eq!(info("sfgpucd---mt").unwrap().affiliation, Affiliation::Friend);
    }

    #[test]
    fn test_numeric_codes() {
        let friend = info("10031000161200000000").unwrap();
        assert_eq!(friend.encoding, CodeEncoding::Numeric);
        assert_eq!(friend.affiliation, Affiliation::Friend);
        assert!(!friend.planned);

        let hostile_planned = info("10061010161200000000").unwrap();
        assert_eq!(hostile_planned.affiliation, Affiliation::Hostile);
        assert!(hostile_planned.planned);
    }

    #[test]
    fn test_rejects_malformed_codes() {
        assert!(info("").is_err());
        assert!(info("SFG").is_err());
        assert!(info("SFGPEWRH--MT-----").is_err());
        assert!(info("XFGPEWRH--MT").is_err());
        assert!(info("SQGPEWRH--MT").is_err());
        assert!(info("SFG PEWRH-MT").is_err());
        assert!(info("1003100016").is_err());
        assert!(info("20031000161200000000").is_err());
        assert!(info("10091000161200000000").is_err());
    }

    #[test]
    fn test_error_names_the_code() {
        let err = info("SFG").unwrap_err();
        assert!(matches!(err, SymbolError::InvalidSymbolCode { ref code, .. } if code == "SFG"));
    }
}
