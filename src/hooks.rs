//! Callbacks used by a server-side [`CookieStore`] to propagate mutations.
//!
//! On the server there is no ambient cookie jar: every `set`/`remove` must be
//! turned into a `Set-Cookie` header on the outgoing response. The store has no
//! access to the response, so it hands the serialized attribute string over to
//! a [`CookieHooks`] implementation instead.
//!
//! [`CookieStore`]: crate::CookieStore
use std::cell::RefCell;
use std::rc::Rc;

/// Receives the mutations applied to a server-side [`CookieStore`].
///
/// Both methods are invoked synchronously, exactly once per successful
/// `set`/`remove` call, after the in-memory state has been updated.
/// They default to no-ops.
///
/// [`CookieStore`]: crate::CookieStore
pub trait CookieHooks {
    /// A cookie was set. `set_cookie` is the value for a `Set-Cookie` header.
    fn on_set(&mut self, name: &str, set_cookie: &str) {
        let _ = (name, set_cookie);
    }

    /// A cookie was removed. `set_cookie` is the value for a `Set-Cookie`
    /// header that deletes the cookie on the client.
    fn on_remove(&mut self, name: &str, set_cookie: &str) {
        let _ = (name, set_cookie);
    }
}

type Callback = Box<dyn FnMut(&str, &str)>;

/// [`CookieHooks`] built out of closures.
///
/// ```rust
/// use cantucci::{CookieOptions, CookieStore, Hooks};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let headers = Rc::new(RefCell::new(Vec::new()));
/// let hooks = {
///     let headers = headers.clone();
///     Hooks::new().when_set(move |_name, set_cookie| {
///         headers.borrow_mut().push(set_cookie.to_string());
///     })
/// };
///
/// let mut store = CookieStore::with_hooks("", hooks).unwrap();
/// store.set("name", "value", &CookieOptions::new()).unwrap();
/// assert_eq!(*headers.borrow(), vec!["name=value; Path=/".to_string()]);
/// ```
#[derive(Default)]
pub struct Hooks {
    on_set: Option<Callback>,
    on_remove: Option<Callback>,
}

impl Hooks {
    /// Hooks that do nothing until callbacks are registered.
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers the callback invoked on every `set`.
    pub fn when_set<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str, &str) + 'static,
    {
        self.on_set = Some(Box::new(callback));
        self
    }

    /// Registers the callback invoked on every `remove`.
    pub fn when_removed<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str, &str) + 'static,
    {
        self.on_remove = Some(Box::new(callback));
        self
    }
}

impl CookieHooks for Hooks {
    fn on_set(&mut self, name: &str, set_cookie: &str) {
        if let Some(callback) = self.on_set.as_mut() {
            callback(name, set_cookie);
        }
    }

    fn on_remove(&mut self, name: &str, set_cookie: &str) {
        if let Some(callback) = self.on_remove.as_mut() {
            callback(name, set_cookie);
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_set", &self.on_set.is_some())
            .field("on_remove", &self.on_remove.is_some())
            .finish()
    }
}

/// [`CookieHooks`] that record every `Set-Cookie` header value, in call order.
///
/// Cloning a collector returns a handle to the same buffer: keep one handle
/// and pass the other to the store. Each collected value must be sent in its
/// own `Set-Cookie` header.
///
/// ```rust
/// use cantucci::{CookieOptions, CookieStore, SetCookieCollector};
///
/// let collector = SetCookieCollector::new();
/// let mut store = CookieStore::with_hooks("session=abc", collector.clone()).unwrap();
///
/// let options = CookieOptions::new().unset_path();
/// store.set("theme", "dark", &options).unwrap();
/// store.remove("session", &options).unwrap();
///
/// assert_eq!(
///     collector.take(),
///     vec![
///         "theme=dark".to_string(),
///         "session=; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
///     ]
/// );
/// assert!(collector.header_values().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SetCookieCollector {
    header_values: Rc<RefCell<Vec<String>>>,
}

impl SetCookieCollector {
    pub fn new() -> Self {
        Default::default()
    }

    /// A copy of the header values collected so far.
    pub fn header_values(&self) -> Vec<String> {
        self.header_values.borrow().clone()
    }

    /// Returns the header values collected so far and empties the buffer.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.header_values.borrow_mut())
    }
}

impl CookieHooks for SetCookieCollector {
    fn on_set(&mut self, _name: &str, set_cookie: &str) {
        self.header_values.borrow_mut().push(set_cookie.to_string());
    }

    fn on_remove(&mut self, _name: &str, set_cookie: &str) {
        self.header_values.borrow_mut().push(set_cookie.to_string());
    }
}
