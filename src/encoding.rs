use percent_encoding::{percent_decode_str, AsciiSet, CONTROLS};
use std::borrow::Cow;

/// https://url.spec.whatwg.org/#fragment-percent-encode-set
const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// https://url.spec.whatwg.org/#path-percent-encode-set
const PATH: &AsciiSet = &FRAGMENT.add(b'#').add(b'?').add(b'{').add(b'}');

/// https://url.spec.whatwg.org/#userinfo-percent-encode-set
const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|')
    .add(b'%');

/// https://www.rfc-editor.org/rfc/rfc6265#section-4.1.1 + '(', ')'
const COOKIE: &AsciiSet = &USERINFO.add(b'(').add(b')').add(b',');

/// Percent-encode a cookie name or value with the proper encoding set.
pub(crate) fn encode(string: &str) -> impl std::fmt::Display + '_ {
    percent_encoding::percent_encode(string.as_bytes(), COOKIE)
}

/// Percent-decode a cookie name or value.
///
/// Cookie headers routinely carry third-party cookies with their own encoding
/// conventions: if the escapes don't decode to valid UTF-8, the raw input is
/// returned untouched.
pub(crate) fn decode(string: &str) -> Cow<'_, str> {
    match percent_decode_str(string).decode_utf8() {
        Ok(decoded) => decoded,
        Err(e) => {
            log::trace!("Keeping `{string}` as is, it can't be percent-decoded: {e}");
            Cow::Borrowed(string)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};

    #[test]
    fn encodes_separators_and_whitespace() {
        let cases = [
            ("value", "value"),
            ("a value", "a%20value"),
            ("a;b", "a%3Bb"),
            ("a=b", "a%3Db"),
            ("100%", "100%25"),
            ("(x,y)", "%28x%2Cy%29"),
            ("ciao-ñ", "ciao-%C3%B1"),
        ];
        for (raw, expected) in cases {
            assert_eq!(encode(raw).to_string(), expected, "Failed for `{raw}`");
        }
    }

    #[test]
    fn decodes_what_it_can() {
        assert_eq!(decode("a%20value"), "a value");
        assert_eq!(decode("ciao-%C3%B1"), "ciao-ñ");
        assert_eq!(decode("d#$%^&*()_"), "d#$%^&*()_");
        // Not valid UTF-8 once decoded.
        assert_eq!(decode("%F1%F2%F3%C0%C1%C2"), "%F1%F2%F3%C0%C1%C2");
    }
}
