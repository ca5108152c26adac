/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape raw page bytes for embedding in HTML. Invalid UTF-8 is replaced, not rejected.
pub fn escape_bytes(bytes: &[u8]) -> String {
    escape_html(&String::from_utf8_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_html("Hello world 123"), "Hello world 123");
    }

    #[test]
    fn escape_bytes_replaces_invalid_utf8() {
        assert_eq!(escape_bytes(b"a\xffb<"), "a\u{FFFD}b&lt;");
    }
}
