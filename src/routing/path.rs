use super::{Error, Result};

/// Splits a path or pattern into its non-empty segments.
///
/// Repeated slashes produce empty segments which are discarded, so
/// `//p///go` and `/p/go` segment identically.
pub fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Validates a route pattern before it is inserted into a trie.
///
/// Rejects wildcards in non-final position, parametric markers that do not
/// occupy the whole segment, and parameters without a name. Patterns that
/// pass here can be inserted and matched consistently.
pub fn validate_pattern(pattern: &str) -> Result<()> {
    let segments = split(pattern);
    for (index, segment) in segments.iter().enumerate() {
        // Char-aware: a segment may start with a multibyte character, so
        // byte-slicing past the first byte would panic.
        if segment.chars().skip(1).any(|c| c == ':' || c == '*') {
            return Err(Error::MixedSegment {
                pattern: pattern.to_string(),
                segment: segment.to_string(),
            });
        }
        match segment.as_bytes()[0] {
            b':' => {
                if segment.len() == 1 {
                    return Err(Error::UnnamedParameter {
                        pattern: pattern.to_string(),
                    });
                }
            }
            b'*' => {
                if segment.len() == 1 {
                    return Err(Error::UnnamedParameter {
                        pattern: pattern.to_string(),
                    });
                }
                if index + 1 != segments.len() {
                    return Err(Error::WildcardNotLast {
                        pattern: pattern.to_string(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(())
}
