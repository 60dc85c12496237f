//! String literal escape decoding.
//!
//! A string literal may contain `\DDD`, where `DDD` is exactly three
//! decimal digits giving a character code. Every other character stands
//! for itself.

use crate::error::LiteralError;

/// Decode the escapes of a raw string literal.
pub fn decode_string(raw: &str) -> Result<String, LiteralError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();

    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let mut code = 0u32;
        for _ in 0..3 {
            let digit = chars
                .next()
                .and_then(|(_, d)| d.to_digit(10))
                .ok_or(LiteralError::MalformedEscape { offset })?;
            code = code * 10 + digit;
        }
        let decoded = char::from_u32(code).ok_or(LiteralError::InvalidCharCode { code })?;
        out.push(decoded);
    }

    Ok(out)
}
