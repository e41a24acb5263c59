//! Safe SQL identifier quoting.
//!
//! Identifiers are wrapped in double quotes with embedded `"` escaped as `""`.
//! Fragments carry an escape flag; when it is cleared the identifier text is
//! emitted verbatim (raw expressions such as `COUNT(*)`).

/// Append `name` wrapped in double quotes, doubling any embedded quote.
pub fn quote_into(out: &mut String, name: &str) {
    out.push('"');
    for ch in name.chars() {
        if ch == '"' {
            out.push('"');
            out.push('"');
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

/// Quote a single identifier.
pub fn quote(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    quote_into(&mut out, name);
    out
}

/// Append a `table`.`column` qualification with both parts quoted.
pub fn quote_qualified(out: &mut String, table: &str, column: &str) {
    quote_into(out, table);
    out.push('.');
    quote_into(out, column);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_simple() {
        assert_eq!(quote("users"), r#""users""#);
    }

    #[test]
    fn quote_preserves_case() {
        assert_eq!(quote("CamelCase"), r#""CamelCase""#);
    }

    #[test]
    fn quote_doubles_embedded_quote() {
        assert_eq!(quote(r#"has"quote"#), r#""has""quote""#);
    }

    #[test]
    fn qualified() {
        let mut out = String::new();
        quote_qualified(&mut out, "users", "id");
        assert_eq!(out, r#""users"."id""#);
    }
}
