//! Cache Key Module
//!
//! Composite `(category, identity)` key and its string encoding.

use std::fmt;

/// Separator placed between the two components of an encoded key.
pub const KEY_SEPARATOR: char = '\x1f';

// == Cache Key ==
/// Identifies one cached result: a data category scoped to one identity.
///
/// Both fields participate in hashing, so two distinct pairs never share a
/// slot regardless of their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub category: String,
    pub identity: String,
}

impl CacheKey {
    pub fn new(category: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            identity: identity.into(),
        }
    }

    // == Encode ==
    /// Encodes the key as `category \x1f identity`.
    ///
    /// Backslashes are doubled and separator bytes inside a component become
    /// `\u`, so the only raw separator in the output is the one between the
    /// components and the encoding stays injective.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.category.len() + self.identity.len() + 1);
        escape_into(&self.category, &mut out);
        out.push(KEY_SEPARATOR);
        escape_into(&self.identity, &mut out);
        out
    }
}

fn escape_into(component: &str, out: &mut String) {
    for c in component.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            KEY_SEPARATOR => out.push_str("\\u"),
            other => out.push(other),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain() {
        let key = CacheKey::new("bing_analytics", "user_42");
        assert_eq!(key.encode(), "bing_analytics\x1fuser_42");
    }

    #[test]
    fn test_encode_escapes_separator() {
        let a = CacheKey::new("a\x1fb", "c");
        let b = CacheKey::new("a", "b\x1fc");

        assert_ne!(a.encode(), b.encode());
        assert_eq!(a.encode().matches(KEY_SEPARATOR).count(), 1);
        assert_eq!(b.encode().matches(KEY_SEPARATOR).count(), 1);
    }

    #[test]
    fn test_encode_escapes_backslash() {
        // Without escaping the escape character these two would collide.
        let a = CacheKey::new("x\\u", "y");
        let b = CacheKey::new("x\x1f", "y");
        assert_ne!(a.encode(), b.encode());
    }

    #[test]
    fn test_display_matches_encode() {
        let key = CacheKey::new("gsc_analytics", "u1");
        assert_eq!(key.to_string(), key.encode());
    }
}
