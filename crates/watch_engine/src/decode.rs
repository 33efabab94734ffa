use std::fmt;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Page text converted to UTF-8, ready for period extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    pub source: EncodingSource,
}

/// Where the page encoding was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    ByteOrderMark,
    ContentType,
    Detected,
}

impl fmt::Display for EncodingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingSource::ByteOrderMark => write!(f, "byte order mark"),
            EncodingSource::ContentType => write!(f, "content-type"),
            EncodingSource::Detected => write!(f, "detection"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("page body is not valid {encoding}")]
    Malformed { encoding: String },
}

/// Converts the period page body to UTF-8.
///
/// A byte order mark wins, then a `charset` in the Content-Type header. Pages
/// served without either (the results site often sends windows-1251 bare) go
/// through `chardetng`, hinted with the host's top-level domain when known.
pub fn decode_html(
    bytes: &[u8],
    content_type: Option<&str>,
    tld: Option<&str>,
) -> Result<DecodedHtml, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_as(bytes, encoding, EncodingSource::ByteOrderMark);
    }

    let declared = content_type
        .and_then(header_charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    if let Some(encoding) = declared {
        return decode_as(bytes, encoding, EncodingSource::ContentType);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guessed = detector.guess(tld.map(str::as_bytes), true);
    decode_as(bytes, guessed, EncodingSource::Detected)
}

fn header_charset(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
    })
}

fn decode_as(
    bytes: &[u8],
    encoding: &'static Encoding,
    source: EncodingSource,
) -> Result<DecodedHtml, DecodeError> {
    let (text, _, malformed) = encoding.decode(bytes);
    if malformed {
        return Err(DecodeError::Malformed {
            encoding: encoding.name().to_string(),
        });
    }
    Ok(DecodedHtml {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::header_charset;

    #[test]
    fn charset_key_is_case_insensitive_and_unquoted() {
        assert_eq!(
            header_charset("text/html; Charset=\"windows-1251\""),
            Some("windows-1251".to_string())
        );
        assert_eq!(header_charset("text/html"), None);
    }
}
