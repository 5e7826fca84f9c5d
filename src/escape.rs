//! Escaping for the contexts entry text is spliced into.
//!
//! | Function | Context |
//! |----------|---------|
//! | [`html`] | Element content and quoted attributes |
//! | [`json_string`] | Inside a `"..."` string of an `ld+json` block, ASCII only |
//! | [`js_string`] | Inside a `"..."` JavaScript string literal |
//! | [`url_component`] | A single URL query value |

use maud::html as markup;

/// HTML-escape text for element content and quoted attributes.
pub fn html(text: &str) -> String {
    markup! { (text) }.into_string().replace('\'', "&#x27;")
}

/// Escape text for a JSON string body (no surrounding quotes).
///
/// Non-ASCII characters become `\uXXXX` escapes, astral characters as
/// surrogate pairs.
pub fn json_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
        }
    }
    out
}

/// Escape text for a double-quoted JavaScript string literal.
pub fn js_string(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Percent-encode every byte outside the unreserved set `A-Z a-z 0-9 - . _ ~`.
pub fn url_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escapes_markup() {
        assert_eq!(
            html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn html_passes_plain_text() {
        assert_eq!(html("List.of(1, 2)"), "List.of(1, 2)");
        assert_eq!(html("Español"), "Español");
    }

    #[test]
    fn json_string_is_ascii_only() {
        assert_eq!(json_string("Año \"nuevo\""), "A\\u00f1o \\\"nuevo\\\"");
        assert_eq!(json_string("a\nb"), "a\\nb");
    }

    #[test]
    fn json_string_astral_as_surrogate_pair() {
        assert_eq!(json_string("🚀"), "\\ud83d\\ude80");
    }

    #[test]
    fn js_string_escapes_quotes_backslashes_newlines() {
        assert_eq!(js_string("say \"hi\"\\\n"), "say \\\"hi\\\"\\\\\\n");
    }

    #[test]
    fn url_component_encodes_reserved() {
        assert_eq!(url_component("a b/c?d=e&f"), "a%20b%2Fc%3Fd%3De%26f");
        assert_eq!(url_component("keep-._~"), "keep-._~");
        assert_eq!(url_component("–"), "%E2%80%93");
    }
}
