//! Escape sequences in string and character literals.

/// A bad escape sequence, located relative to the literal's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscapeError {
    /// Byte offset of the backslash within the content.
    pub offset: usize,
    /// Byte length of the offending sequence.
    pub len: usize,
}

/// Resolve escapes in literal content (quotes already stripped).
///
/// Supported: `\n \t \r \0 \\ \" \'` and `\uXXXX`.
pub fn unescape(content: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.char_indices();
    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            return Err(EscapeError { offset, len: 1 });
        };
        let resolved = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'u' => {
                let rest = &content[offset + 2..];
                let digits = rest.get(..4).unwrap_or(rest);
                let code = (digits.len() == 4)
                    .then(|| u32::from_str_radix(digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                let Some(code) = code else {
                    return Err(EscapeError {
                        offset,
                        len: 2 + digits.len(),
                    });
                };
                for _ in 0..4 {
                    chars.next();
                }
                code
            }
            other => {
                return Err(EscapeError {
                    offset,
                    len: 1 + other.len_utf8(),
                })
            }
        };
        out.push(resolved);
    }
    Ok(out)
}
