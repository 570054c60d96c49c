//! Rate limit bucket identifiers.

use std::fmt;

/// Identifier of a rate-limit accounting domain.
///
/// Built from an operation family and a routing target, e.g. `account-americas`
/// or `summoner-euw1`. Every call sharing a key shares one dual-window quota
/// and one dispatch order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey(String);

impl BucketKey {
    /// Build a key from an operation family and its routing target.
    pub fn new(family: &str, target: &str) -> Self {
        Self(format!("{family}-{target}"))
    }

    /// Use a literal key, for buckets without a routing target.
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_key_format() {
        assert_eq!(BucketKey::new("account", "americas").as_str(), "account-americas");
        assert_eq!(BucketKey::named("ddragon").to_string(), "ddragon");
        assert_ne!(BucketKey::new("summoner", "na1"), BucketKey::new("league", "na1"));
    }
}
