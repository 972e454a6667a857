use crate::codec::{self, InvalidOptionError};
use crate::hooks::CookieHooks;
use crate::jar::AmbientJar;
use crate::{CookieMap, CookieOptions, Environment};
use std::collections::HashMap;
use std::fmt;

/// Read and write cookies with the same API in the browser and on the server.
///
/// A `CookieStore` runs in one of two [`Mode`]s, selected once when it is built:
///
/// - **Browser**: an ambient cookie jar (`document.cookie`) is available.
///   Every read re-parses the jar, so cookies written by other scripts are
///   always visible. Writes are applied to the jar directly.
/// - **Server**: cookies come from the `Cookie` header of the request being
///   handled. They are parsed once, when the store is built, and mutated in
///   memory. Every mutation is forwarded to [`CookieHooks`], so that it can be
///   turned into a `Set-Cookie` header on the outgoing response.
///
/// # Server
///
/// ```rust
/// use cantucci::{CookieOptions, CookieStore, SetCookieCollector};
///
/// let collector = SetCookieCollector::new();
/// let mut store = CookieStore::with_hooks(
///     "testingCookie=yes; testingCookie2=yup",
///     collector.clone(),
/// ).unwrap();
///
/// assert_eq!(store.get("testingCookie").as_deref(), Some("yes"));
///
/// store.set("test", "meow", &CookieOptions::new()).unwrap();
/// assert_eq!(store.get("test").as_deref(), Some("meow"));
/// assert_eq!(collector.header_values(), vec!["test=meow; Path=/".to_string()]);
/// ```
///
/// # Browser
///
/// ```rust
/// use cantucci::{CookieOptions, CookieStore, Environment};
/// use cantucci::jar::{AmbientJar, InMemoryJar};
///
/// let jar = InMemoryJar::new();
/// let mut store = CookieStore::builder()
///     .environment(Environment::browser(jar.clone()))
///     .build()
///     .unwrap();
///
/// // Written by someone else, after the store was built.
/// jar.write("testingCookie=yes");
/// assert_eq!(store.get("testingCookie").as_deref(), Some("yes"));
///
/// store.remove("testingCookie", &CookieOptions::new()).unwrap();
/// assert_eq!(store.get("testingCookie"), None);
/// ```
pub struct CookieStore {
    inner: Inner,
}

enum Inner {
    Browser {
        jar: Box<dyn AmbientJar>,
    },
    Server {
        cookies: CookieMap,
        hooks: Option<Box<dyn CookieHooks>>,
    },
}

/// The mode a [`CookieStore`] runs in. See [`CookieStore`] for details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Browser,
    Server,
}

impl CookieStore {
    /// Builds a store for the detected [`Environment`], without cookies nor hooks.
    ///
    /// It only succeeds in the browser: on the server, use
    /// [`CookieStore::from_source()`] or [`CookieStore::with_hooks()`].
    pub fn new() -> Result<CookieStore, StoreError> {
        Self::builder().build()
    }

    /// Builds a server-side store out of the request cookies, without hooks.
    ///
    /// Mutations are applied to the in-memory cookies but not propagated anywhere.
    pub fn from_source<S>(source: S) -> Result<CookieStore, StoreError>
    where
        S: Into<CookieSource>,
    {
        Self::builder().source(source).build()
    }

    /// Builds a server-side store out of the request cookies, forwarding
    /// mutations to `hooks`.
    pub fn with_hooks<S, H>(source: S, hooks: H) -> Result<CookieStore, StoreError>
    where
        S: Into<CookieSource>,
        H: CookieHooks + 'static,
    {
        Self::builder().source(source).hooks(hooks).build()
    }

    pub fn builder() -> StoreBuilder {
        Default::default()
    }

    pub fn mode(&self) -> Mode {
        match self.inner {
            Inner::Browser { .. } => Mode::Browser,
            Inner::Server { .. } => Mode::Server,
        }
    }

    /// Get the value of the cookie named `name`.
    ///
    /// It returns `None` if there is no such cookie.
    pub fn get(&self, name: &str) -> Option<String> {
        match &self.inner {
            Inner::Browser { jar } => {
                let mut cookies = codec::parse(&jar.read());
                cookies.remove(name)
            }
            Inner::Server { cookies, .. } => cookies.get(name).map(ToOwned::to_owned),
        }
    }

    /// Get all cookies.
    ///
    /// The returned map is a snapshot: changing it doesn't affect the store.
    pub fn get_all(&self) -> CookieMap {
        match &self.inner {
            Inner::Browser { jar } => codec::parse(&jar.read()),
            Inner::Server { cookies, .. } => cookies.clone(),
        }
    }

    /// Set the cookie named `name` to `value`.
    ///
    /// # Errors
    ///
    /// It fails if `name` or `options` can't be serialized safely.
    /// Nothing is changed in that case.
    pub fn set(
        &mut self,
        name: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), InvalidOptionError> {
        let set_cookie = codec::serialize(name, value, options)?;
        log::debug!("Setting the `{name}` cookie");
        match &mut self.inner {
            Inner::Browser { jar } => jar.write(&set_cookie),
            Inner::Server { cookies, hooks } => {
                cookies.insert(name, value);
                if let Some(hooks) = hooks {
                    hooks.on_set(name, &set_cookie);
                }
            }
        }
        Ok(())
    }

    /// Remove the cookie named `name`.
    ///
    /// Removing a cookie that doesn't exist is not an error.
    /// `options` must carry the same `path` and `domain` used to set the
    /// cookie, otherwise the browser won't delete it.
    ///
    /// # Errors
    ///
    /// It fails if `name` or `options` can't be serialized safely.
    pub fn remove(&mut self, name: &str, options: &CookieOptions) -> Result<(), InvalidOptionError> {
        let set_cookie = codec::serialize_removal(name, options)?;
        log::debug!("Removing the `{name}` cookie");
        match &mut self.inner {
            Inner::Browser { jar } => jar.write(&set_cookie),
            Inner::Server { cookies, hooks } => {
                cookies.remove(name);
                if let Some(hooks) = hooks {
                    hooks.on_remove(name, &set_cookie);
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl CookieStore {
    /// Get the cookie named `name` and deserialize its value from JSON.
    ///
    /// ```rust
    /// use cantucci::{CookieOptions, CookieStore};
    ///
    /// let mut store = CookieStore::from_source("").unwrap();
    /// store.set_json("prefs", &vec![1, 2, 3], &CookieOptions::new()).unwrap();
    ///
    /// let prefs: Option<Vec<u32>> = store.get_json("prefs").unwrap();
    /// assert_eq!(prefs, Some(vec![1, 2, 3]));
    /// ```
    pub fn get_json<T>(&self, name: &str) -> Result<Option<T>, serde_json::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        self.get(name)
            .map(|value| serde_json::from_str(&value))
            .transpose()
    }

    /// Serialize `value` to JSON and store it in the cookie named `name`.
    pub fn set_json<T>(
        &mut self,
        name: &str,
        value: &T,
        options: &CookieOptions,
    ) -> Result<(), SetJsonError>
    where
        T: serde::Serialize + ?Sized,
    {
        let value = serde_json::to_string(value)?;
        self.set(name, &value, options)?;
        Ok(())
    }
}

impl fmt::Debug for CookieStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Browser { .. } => f
                .debug_struct("CookieStore")
                .field("mode", &Mode::Browser)
                .finish(),
            Inner::Server { cookies, hooks } => f
                .debug_struct("CookieStore")
                .field("mode", &Mode::Server)
                .field("cookies", cookies)
                .field("hooks", &hooks.is_some())
                .finish(),
        }
    }
}

/// The request cookies a server-side [`CookieStore`] is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieSource {
    /// The raw value of a `Cookie` header.
    Header(String),
    /// Cookies that have already been parsed.
    Map(CookieMap),
}

impl From<&str> for CookieSource {
    fn from(header: &str) -> Self {
        CookieSource::Header(header.to_string())
    }
}

impl From<String> for CookieSource {
    fn from(header: String) -> Self {
        CookieSource::Header(header)
    }
}

impl From<CookieMap> for CookieSource {
    fn from(cookies: CookieMap) -> Self {
        CookieSource::Map(cookies)
    }
}

impl From<HashMap<String, String>> for CookieSource {
    fn from(cookies: HashMap<String, String>) -> Self {
        CookieSource::Map(cookies.into())
    }
}

/// Builds a [`CookieStore`].
///
/// Use [`StoreBuilder::environment()`] to skip environment detection, e.g.
/// to exercise browser behaviour in tests.
#[derive(Default)]
pub struct StoreBuilder {
    environment: Option<Environment>,
    source: Option<CookieSource>,
    hooks: Option<Box<dyn CookieHooks>>,
}

impl StoreBuilder {
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// The request cookies. Required on the server, forbidden in the browser.
    pub fn source<S>(mut self, source: S) -> Self
    where
        S: Into<CookieSource>,
    {
        self.source = Some(source.into());
        self
    }

    /// The hooks notified of every mutation. Server only.
    pub fn hooks<H>(mut self, hooks: H) -> Self
    where
        H: CookieHooks + 'static,
    {
        self.hooks = Some(Box::new(hooks));
        self
    }

    pub fn build(self) -> Result<CookieStore, StoreError> {
        let environment = self.environment.unwrap_or_else(Environment::detect);
        let inner = match environment {
            Environment::Browser(jar) => {
                if self.source.is_some() || self.hooks.is_some() {
                    return Err(EnvironmentError { _priv: () }.into());
                }
                Inner::Browser { jar }
            }
            Environment::Server => {
                let cookies = match self.source {
                    Some(CookieSource::Header(header)) => codec::parse(&header),
                    Some(CookieSource::Map(cookies)) => cookies,
                    None => return Err(MissingSourceError { _priv: () }.into()),
                };
                Inner::Server {
                    cookies,
                    hooks: self.hooks,
                }
            }
        };
        let store = CookieStore { inner };
        log::debug!("Built a cookie store in {:?} mode", store.mode());
        Ok(store)
    }
}

impl fmt::Debug for StoreBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("environment", &self.environment)
            .field("source", &self.source)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned when a [`CookieStore`] can't be built.
pub enum StoreError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
    #[error(transparent)]
    MissingSource(#[from] MissingSourceError),
}

#[derive(Debug, thiserror::Error)]
#[error("The browser should not provide the cookies")]
/// Cookies or hooks were provided to a store running in the browser.
///
/// The browser has a live cookie jar: a snapshot would shadow it.
pub struct EnvironmentError {
    _priv: (),
}

#[derive(Debug, thiserror::Error)]
#[error("Missing the cookie header or object")]
/// No cookies were provided to a store running on the server.
pub struct MissingSourceError {
    _priv: (),
}

#[cfg(feature = "serde")]
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`CookieStore::set_json()`].
pub enum SetJsonError {
    #[error("Failed to serialize the cookie value as JSON")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidOption(#[from] InvalidOptionError),
}

#[cfg(test)]
mod tests {
    use super::{CookieStore, Mode, StoreError};
    use crate::jar::{AmbientJar, InMemoryJar};
    use crate::{CookieOptions, Environment, Hooks};
    use googletest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn browser_store(jar: &InMemoryJar) -> CookieStore {
        CookieStore::builder()
            .environment(Environment::browser(jar.clone()))
            .build()
            .unwrap()
    }

    #[test]
    fn browser_rejects_a_source() {
        let err = CookieStore::builder()
            .environment(Environment::browser(InMemoryJar::new()))
            .source("testingCookie=yes")
            .build()
            .unwrap_err();
        assert!(matches!(err, StoreError::Environment(_)));
        assert_that!(
            err,
            displays_as(eq("The browser should not provide the cookies"))
        );
    }

    #[test]
    fn browser_rejects_hooks() {
        let err = CookieStore::builder()
            .environment(Environment::browser(InMemoryJar::new()))
            .hooks(Hooks::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, StoreError::Environment(_)));
    }

    #[test]
    fn server_requires_a_source() {
        let err = CookieStore::builder()
            .environment(Environment::Server)
            .build()
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingSource(_)));
        assert_that!(err, displays_as(eq("Missing the cookie header or object")));
    }

    #[test]
    fn mode_is_fixed_at_construction() {
        let jar = InMemoryJar::new();
        assert_that!(browser_store(&jar).mode(), eq(Mode::Browser));
        let store = CookieStore::from_source("").unwrap();
        assert_that!(store.mode(), eq(Mode::Server));
    }

    #[test]
    fn browser_writes_go_to_the_jar() {
        let jar = InMemoryJar::new();
        let mut store = browser_store(&jar);
        store.set("a b", "c;d", &CookieOptions::new()).unwrap();
        assert_that!(jar.read(), eq("a%20b=c%3Bd"));
        assert_that!(store.get("a b"), some(eq("c;d")));
    }

    #[test]
    fn failed_writes_leave_the_store_untouched() {
        let calls = Rc::new(RefCell::new(0));
        let hooks = {
            let calls = calls.clone();
            Hooks::new().when_set(move |_, _| *calls.borrow_mut() += 1)
        };
        let mut store = CookieStore::with_hooks("a=1", hooks).unwrap();

        assert!(store.set("a=", "2", &CookieOptions::new()).is_err());
        assert!(store.remove("", &CookieOptions::new()).is_err());
        assert_that!(store.get("a"), some(eq("1")));
        assert_that!(*calls.borrow(), eq(0));

        let jar = InMemoryJar::new();
        let mut store = browser_store(&jar);
        assert!(store.set("a;b", "2", &CookieOptions::new()).is_err());
        assert_that!(jar.read(), eq(""));
    }

    #[test]
    fn get_all_returns_a_snapshot() {
        let mut store = CookieStore::from_source("a=1").unwrap();
        let mut snapshot = store.get_all();
        snapshot.insert("b", "2");
        snapshot.remove("a");
        assert_that!(store.get("a"), some(eq("1")));
        assert_that!(store.get("b"), none());

        store.set("c", "3", &CookieOptions::new()).unwrap();
        assert_that!(snapshot.get("c"), none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_values() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Prefs {
            theme: String,
            font_size: u8,
        }

        let jar = InMemoryJar::new();
        let mut store = browser_store(&jar);
        let prefs = Prefs {
            theme: "dark".into(),
            font_size: 12,
        };
        store
            .set_json("prefs", &prefs, &CookieOptions::new())
            .unwrap();
        assert_that!(store.get_json::<Prefs>("prefs"), ok(some(eq(prefs))));
        assert_that!(store.get_json::<Prefs>("missing"), ok(none()));

        jar.write("prefs=not-json");
        assert!(store.get_json::<Prefs>("prefs").is_err());
    }
}
