//! Path variable storage.
//!
//! Routes declare variables with a `:name` segment. When a route matches, the
//! router binds each variable to the corresponding request segment value
//! (without its leading `/`) and stores it here.

use smallvec::SmallVec;

/// Most routes capture at most a handful of variables; keep those inline.
const INLINE_PARAMS: usize = 4;

/// Named path variables bound by a route match.
///
/// # Example
///
/// ```rust
/// use fastroute_core::Params;
///
/// let mut params = Params::new();
/// params.insert("user", "gopher");
/// params.insert("repo", "fastroute");
///
/// assert_eq!(params.get("user"), Some("gopher"));
/// assert_eq!(params.get("repo"), Some("fastroute"));
/// assert_eq!(params.get("branch"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty set of variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any earlier binding of `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns true if no variables are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Removes every binding.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_new_is_empty() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.len(), 0);
    }

    #[test]
    fn test_params_insert_and_get() {
        let mut params = Params::new();
        params.insert("a", "x");
        params.insert("b", "y");

        assert_eq!(params.get("a"), Some("x"));
        assert_eq!(params.get("b"), Some("y"));
        assert!(params.contains("a"));
        assert!(!params.contains("c"));
    }

    #[test]
    fn test_params_insert_replaces() {
        let mut params = Params::new();
        params.insert("id", "1");
        params.insert("id", "2");

        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id"), Some("2"));
    }

    #[test]
    fn test_params_iter_keeps_order() {
        let params: Params = [("first", "1"), ("second", "2")].into_iter().collect();
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("first", "1"), ("second", "2")]);
    }

    #[test]
    fn test_params_spill_past_inline_capacity() {
        let mut params = Params::new();
        for i in 0..10 {
            params.insert(format!("k{i}"), format!("v{i}"));
        }
        assert_eq!(params.len(), 10);
        assert_eq!(params.get("k7"), Some("v7"));

        params.clear();
        assert!(params.is_empty());
    }
}
