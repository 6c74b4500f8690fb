/// First divergence between the produced output and the expected answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Mismatch {
    #[error("Expected {expected:?} but found {found:?} at {line}:{column}")]
    Differ {
        expected: char,
        found: char,
        line: usize,
        column: usize,
    },

    /// The produced output ended first.
    #[error("Unexpected end of expected data (output is too short)")]
    ProducedTooShort,

    /// The expected answer ended first.
    #[error("Unexpected end of produced data (output is too long)")]
    ProducedTooLong,
}

/// Compare the produced output with the expected answer.
///
/// Leading and trailing whitespace (and byte order marks) of each whole stream
/// is ignored; everything else, including whitespace inside, must match exactly.
/// Positions are 1-based `line:column` in the produced output, with columns
/// counted in UTF-16 code units.
pub fn diff(produced: &str, expected: &str) -> Result<(), Mismatch> {
    let produced = trim_stream(produced);
    let mut expected_chars = trim_stream(expected).chars();

    let (mut line, mut column) = (1, 1);
    for found in produced.chars() {
        let Some(expected) = expected_chars.next() else {
            return Err(Mismatch::ProducedTooLong);
        };
        if found != expected {
            return Err(Mismatch::Differ {
                expected,
                found,
                line,
                column,
            });
        }
        if found == '\n' {
            line += 1;
            column = 1;
        } else {
            column += found.len_utf16();
        }
    }

    match expected_chars.next() {
        Some(_) => Err(Mismatch::ProducedTooShort),
        None => Ok(()),
    }
}

fn trim_stream(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}
