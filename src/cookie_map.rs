use std::collections::hash_map;
use std::collections::HashMap;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
/// A mapping from cookie names to their (percent-decoded) values.
///
/// Names are unique: inserting a value for a name that is already present
/// replaces the previous value.
///
/// ```rust
/// use cantucci::CookieMap;
///
/// let mut cookies = CookieMap::new();
/// cookies.insert("name", "first");
/// cookies.insert("name", "second");
///
/// assert_eq!(cookies.get("name"), Some("second"));
/// assert_eq!(cookies.len(), 1);
/// ```
pub struct CookieMap {
    cookies: HashMap<String, String>,
}

impl CookieMap {
    /// Creates a new, empty [`CookieMap`].
    pub fn new() -> CookieMap {
        Default::default()
    }

    /// Returns the value associated with `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns `true` if a cookie named `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Inserts a cookie, returning the value it replaced, if any.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<String>
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.cookies.insert(name.into(), value.into())
    }

    /// Removes the cookie named `name`, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.cookies.remove(name)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterates over all `(name, value)` pairs, in arbitrary order.
    pub fn iter(&self) -> CookieMapIter<'_> {
        CookieMapIter {
            inner: self.cookies.iter(),
        }
    }

    /// Iterates over all cookie names, in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.cookies.keys().map(String::as_str)
    }
}

/// Iterator over the `(name, value)` pairs of a [`CookieMap`].
///
/// This struct is created by the [`CookieMap::iter()`] method.
pub struct CookieMapIter<'map> {
    inner: hash_map::Iter<'map, String, String>,
}

impl<'map> Iterator for CookieMapIter<'map> {
    type Item = (&'map str, &'map str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for CookieMapIter<'_> {}

impl std::iter::FusedIterator for CookieMapIter<'_> {}

impl<'map> IntoIterator for &'map CookieMap {
    type Item = (&'map str, &'map str);
    type IntoIter = CookieMapIter<'map>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for CookieMap {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.into_iter()
    }
}

impl<N, V> FromIterator<(N, V)> for CookieMap
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut cookies = CookieMap::new();
        cookies.extend(iter);
        cookies
    }
}

impl<N, V> Extend<(N, V)> for CookieMap
where
    N: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl From<HashMap<String, String>> for CookieMap {
    fn from(cookies: HashMap<String, String>) -> Self {
        CookieMap { cookies }
    }
}

impl From<CookieMap> for HashMap<String, String> {
    fn from(map: CookieMap) -> Self {
        map.cookies
    }
}

#[cfg(test)]
mod tests {
    use super::CookieMap;
    use googletest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn last_insert_wins() {
        let cookies: CookieMap = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_that!(cookies.len(), eq(2));
        assert_that!(cookies.get("a"), some(eq("3")));
        assert_that!(cookies.get("b"), some(eq("2")));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cookies = CookieMap::new();
        cookies.insert("a", "1");
        assert_that!(cookies.remove("a"), some(eq("1")));
        assert_that!(cookies.remove("a"), none());
        assert_that!(cookies.is_empty(), eq(true));
    }

    #[test]
    fn converts_from_and_into_a_hash_map() {
        let raw = HashMap::from([("name".to_string(), "value".to_string())]);
        let cookies = CookieMap::from(raw.clone());
        assert_that!(cookies.contains("name"), eq(true));
        assert_that!(HashMap::from(cookies), eq(raw));
    }

    #[test]
    fn get_lifetime() {
        let mut cookies = CookieMap::new();
        cookies.insert("name", "value");

        // Compile-time check: lookups work with keys that don't outlive the map.
        let key = "name".to_string();
        cookies.get(key.as_str());
    }
}
