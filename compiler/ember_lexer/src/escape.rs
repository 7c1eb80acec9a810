//! Escape sequence cooking for char and string literals.

/// Resolve the character after a backslash. Returns the offending character
/// on an unknown escape.
fn unescape(c: char) -> Result<char, char> {
    match c {
        'n' => Ok('\n'),
        't' => Ok('\t'),
        'r' => Ok('\r'),
        '0' => Ok('\0'),
        '\\' => Ok('\\'),
        '\'' => Ok('\''),
        '"' => Ok('"'),
        other => Err(other),
    }
}

/// Cook the body of a char literal (the text between the quotes).
///
/// The raw regex guarantees the body is one character or one escape.
pub(crate) fn cook_char(body: &str) -> Result<char, char> {
    let mut chars = body.chars();
    match (chars.next(), chars.next()) {
        (Some('\\'), Some(escaped)) => unescape(escaped),
        (Some(c), None) => Ok(c),
        _ => Err(body.chars().last().unwrap_or('\'')),
    }
}

/// Cook the body of a string literal.
pub(crate) fn cook_string(body: &str) -> Result<String, char> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            // The raw regex never ends a string on a lone backslash.
            let escaped = chars.next().ok_or('\\')?;
            out.push(unescape(escaped)?);
        } else {
            out.push(c);
        }
    }
    Ok(out)
}
