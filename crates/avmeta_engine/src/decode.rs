use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decode response bytes into UTF-8: BOM -> Content-Type charset ->
/// chardetng guess.
///
/// The sources serve a mix of UTF-8, EUC-JP and Shift_JIS, often with wrong
/// or missing charset headers. Decoding is lossy on purpose: a garbled span
/// must degrade to empty getter values downstream, never fail a fetch.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding.decode(bytes).0.into_owned();
    }

    if let Some(label) = content_type.and_then(charset_label) {
        if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
            return encoding.decode(bytes).0.into_owned();
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true).decode(bytes).0.into_owned()
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').find_map(|part| {
        let part = part.trim();
        let head = part.get(..8)?;
        if !head.eq_ignore_ascii_case("charset=") {
            return None;
        }
        Some(part.get(8..)?.trim_matches([' ', '"', '\''].as_ref()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn honors_content_type_charset() {
        let text = decode_body(b"caf\xe9", Some("text/html; charset=ISO-8859-1"));
        assert_eq!(text, "caf\u{e9}");
    }

    #[test]
    fn strips_bom() {
        let text = decode_body(b"\xEF\xBB\xBFabc", Some("text/html"));
        assert_eq!(text, "abc");
    }
}
