//! Text matching: shell-style wildcards and full-string regular expressions.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Result;

/// Compiled, fully anchored regexes keyed by their source pattern.
static COMPILED_PATTERNS: Lazy<RwLock<HashMap<String, Regex>>> = Lazy::new(Default::default);

/// Matches `text` against a wildcard pattern.
///
/// `?` matches exactly one character and `*` matches any run of characters,
/// including none. Every other character matches itself. The whole of
/// `text` must be covered by the pattern.
///
/// ```
/// use gather::pattern::wildcard_match;
///
/// assert!(wildcard_match("abc.wav", "*.w?v"));
/// assert!(wildcard_match("Sushant Gupta", "S*Gupta"));
/// assert!(!wildcard_match("abc.wav", "??.wav"));
/// ```
pub fn wildcard_match(text: &str, pattern: &str) -> bool {
    // byte offsets into text and pattern
    let mut i = 0;
    let mut j = 0;
    // offset of the last star, and the text offset it resumes from
    let mut star: Option<(usize, usize)> = None;

    while let Some(t) = text[i..].chars().next() {
        match pattern[j..].chars().next() {
            Some(p) if p == '?' || p == t => {
                i += t.len_utf8();
                j += p.len_utf8();
            }
            Some('*') => {
                star = Some((j, i));
                j += 1;
            }
            _ => match star.as_mut() {
                Some((star_at, resume)) => {
                    *resume += text[*resume..].chars().next().map_or(1, char::len_utf8);
                    j = *star_at + 1;
                    i = *resume;
                }
                None => return false,
            },
        }
    }

    pattern[j..].bytes().all(|b| b == b'*')
}

/// Returns the cached, anchored compilation of `pattern`.
pub(crate) fn compiled(pattern: &str) -> Result<Regex> {
    if let Some(regex) = COMPILED_PATTERNS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return Ok(regex.clone());
    }

    let regex = Regex::new(&format!(r"\A(?:{pattern})\z"))?;
    tracing::debug!(pattern, "compiled regex");
    COMPILED_PATTERNS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(pattern.to_string(), regex.clone());
    Ok(regex)
}

/// Returns `true` if the regex `pattern` matches the whole of `text`.
///
/// Compiled patterns are cached for reuse across calls and threads.
///
/// # Errors
///
/// Returns [`GatherError::InvalidRegex`](crate::GatherError::InvalidRegex)
/// if the pattern does not compile.
pub fn regex_match(text: &str, pattern: &str) -> Result<bool> {
    Ok(compiled(pattern)?.is_match(text))
}

/// Returns `true` if a precompiled regex matches the whole of `text`.
///
/// The regex is used as built, so options set through
/// [`RegexBuilder`](regex::RegexBuilder) apply, and it is not cached. It
/// matches when its leftmost match spans the text; an alternation whose
/// first branch matches a prefix needs explicit anchors (`^(?:a|abc)$`).
pub fn regex_match_compiled(text: &str, regex: &Regex) -> bool {
    regex
        .find(text)
        .is_some_and(|found| found.start() == 0 && found.end() == text.len())
}
