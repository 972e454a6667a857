//! Ambient cookie jars.
//!
//! In a browser, cookies live in a process-wide, string-encoded property
//! (`document.cookie`) that any script on the page can read or overwrite.
//! [`AmbientJar`] abstracts over it, so that the [`CookieStore`] never holds
//! a direct reference to a global.
//!
//! Two implementations are provided:
//!
//! - [`InMemoryJar`], which mimics the semantics of `document.cookie` on top
//!   of an in-process buffer. Useful in tests and in non-browser hosts that
//!   still want browser-like behaviour.
//! - `DocumentJar`, backed by the real `document.cookie`. It is only
//!   available when targeting `wasm32` with the `browser` feature enabled.
//!
//! [`CookieStore`]: crate::CookieStore
use crate::codec::HTTP_DATE;
use std::cell::RefCell;
use std::rc::Rc;
use time::{OffsetDateTime, PrimitiveDateTime};

/// A live, ambient cookie jar.
///
/// Reads must reflect the state of the jar at call time: implementations
/// must not cache.
pub trait AmbientJar {
    /// Returns the jar's content as a `name1=value1; name2=value2` string.
    fn read(&self) -> String;

    /// Applies a `Set-Cookie`-style attribute string to the jar.
    ///
    /// Like `document.cookie`, this merges with (or overwrites, or deletes)
    /// the cookie with the same name, path and domain.
    fn write(&self, set_cookie: &str);
}

impl<J: AmbientJar + ?Sized> AmbientJar for Rc<J> {
    fn read(&self) -> String {
        (**self).read()
    }

    fn write(&self, set_cookie: &str) {
        (**self).write(set_cookie)
    }
}

/// An in-process jar following `document.cookie` semantics.
///
/// Cloning an [`InMemoryJar`] returns a new handle to the **same** jar: writes
/// made through one handle are visible through all the others.
///
/// ```rust
/// use cantucci::jar::{AmbientJar, InMemoryJar};
///
/// let jar = InMemoryJar::new();
/// jar.write("name=value; Path=/");
/// jar.write("other=1");
/// assert_eq!(jar.read(), "name=value; other=1");
///
/// // An expired write deletes the cookie.
/// jar.write("name=; Max-Age=0");
/// assert_eq!(jar.read(), "other=1");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryJar {
    cookies: Rc<RefCell<Vec<StoredCookie>>>,
}

#[derive(Debug, Clone)]
struct StoredCookie {
    name: String,
    value: String,
    path: String,
    domain: String,
    expires_at: Option<OffsetDateTime>,
}

impl StoredCookie {
    fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    fn same_identity(&self, other: &StoredCookie) -> bool {
        self.name == other.name && self.path == other.path && self.domain == other.domain
    }
}

impl InMemoryJar {
    /// Creates a new, empty jar.
    pub fn new() -> Self {
        Default::default()
    }

    /// Removes every cookie from the jar.
    pub fn clear(&self) {
        self.cookies.borrow_mut().clear();
    }

    fn parse_write(set_cookie: &str, now: OffsetDateTime) -> Option<StoredCookie> {
        let mut parts = set_cookie.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = StoredCookie {
            name: name.to_string(),
            value: value.trim().to_string(),
            path: "/".to_string(),
            domain: String::new(),
            expires_at: None,
        };
        let mut max_age = None;
        let mut expires = None;
        for attribute in parts {
            let (key, value) = match attribute.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (attribute.trim(), ""),
            };
            match key.to_ascii_lowercase().as_str() {
                "path" if value.starts_with('/') => cookie.path = value.to_string(),
                "domain" if !value.is_empty() => {
                    let domain = value.strip_prefix('.').unwrap_or(value);
                    cookie.domain = domain.to_ascii_lowercase();
                }
                "max-age" => max_age = value.parse::<i64>().ok(),
                "expires" => {
                    expires = PrimitiveDateTime::parse(value, HTTP_DATE)
                        .map(PrimitiveDateTime::assume_utc)
                        .ok()
                }
                // Scripts can't create `HttpOnly` cookies.
                "httponly" => return None,
                _ => {}
            }
        }

        // `Max-Age` takes precedence over `Expires`.
        cookie.expires_at = match (max_age, expires) {
            (Some(seconds), _) if seconds <= 0 => Some(OffsetDateTime::UNIX_EPOCH),
            (Some(seconds), _) => now.checked_add(time::Duration::seconds(seconds)),
            (None, expires) => expires,
        };
        Some(cookie)
    }
}

impl AmbientJar for InMemoryJar {
    fn read(&self) -> String {
        let now = OffsetDateTime::now_utc();
        let mut cookies = self.cookies.borrow_mut();
        cookies.retain(|c| !c.is_expired(now));
        cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write(&self, set_cookie: &str) {
        let now = OffsetDateTime::now_utc();
        let Some(cookie) = Self::parse_write(set_cookie, now) else {
            log::trace!("The jar ignored `{set_cookie}`");
            return;
        };

        let mut cookies = self.cookies.borrow_mut();
        let existing = cookies.iter().position(|c| c.same_identity(&cookie));
        match (existing, cookie.is_expired(now)) {
            (Some(index), true) => {
                cookies.remove(index);
            }
            (Some(index), false) => cookies[index] = cookie,
            (None, true) => {}
            (None, false) => cookies.push(cookie),
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
pub use document::DocumentJar;

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
mod document {
    use super::AmbientJar;
    use wasm_bindgen::JsCast;

    /// The browser's `document.cookie`.
    pub struct DocumentJar {
        document: web_sys::HtmlDocument,
    }

    impl DocumentJar {
        /// Returns `None` outside of a browsing context (e.g. in a web worker).
        pub fn new() -> Option<DocumentJar> {
            let document = web_sys::window()?.document()?;
            let document = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
            Some(DocumentJar { document })
        }
    }

    impl AmbientJar for DocumentJar {
        fn read(&self) -> String {
            self.document.cookie().unwrap_or_default()
        }

        fn write(&self, set_cookie: &str) {
            if let Err(e) = self.document.set_cookie(set_cookie) {
                log::debug!("`document.cookie` rejected `{set_cookie}`: {e:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AmbientJar, InMemoryJar};
    use googletest::prelude::*;
    use std::rc::Rc;

    #[test]
    fn writes_merge_by_name_path_and_domain() {
        let jar = InMemoryJar::new();
        jar.write("a=1");
        jar.write("b=2; Path=/");
        jar.write("a=3; Path=/");
        assert_that!(jar.read(), eq("a=3; b=2"));

        // Different path, different cookie.
        jar.write("a=4; Path=/admin");
        assert_that!(jar.read(), eq("a=3; b=2; a=4"));

        jar.write("b=5; Domain=.Example.com");
        assert_that!(jar.read(), eq("a=3; b=2; a=4; b=5"));
        jar.write("b=6; domain=example.com");
        assert_that!(jar.read(), eq("a=3; b=2; a=4; b=6"));
    }

    #[test]
    fn expired_writes_delete() {
        let jar = InMemoryJar::new();
        jar.write("a=1; Path=/");
        jar.write("b=1; Path=/");
        jar.write("c=1; Path=/");

        jar.write("a=; Max-Age=0");
        jar.write("b=; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert_that!(jar.read(), eq("c=1"));
    }

    #[test]
    fn max_age_takes_precedence_over_expires() {
        let jar = InMemoryJar::new();
        jar.write("a=1; Max-Age=3600; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert_that!(jar.read(), eq("a=1"));

        jar.write("a=1; Max-Age=-1; Expires=Fri, 31 Dec 9999 23:59:59 GMT");
        assert_that!(jar.read(), eq(""));
    }

    #[test]
    fn removal_with_a_different_path_is_a_no_op() {
        let jar = InMemoryJar::new();
        jar.write("a=1; Path=/admin");
        jar.write("a=; Path=/; Max-Age=0");
        assert_that!(jar.read(), eq("a=1"));
    }

    #[test]
    fn malformed_and_http_only_writes_are_ignored() {
        let jar = InMemoryJar::new();
        jar.write("garbage");
        jar.write("=value");
        jar.write("secret=1; HttpOnly");
        assert_that!(jar.read(), eq(""));
    }

    #[test]
    fn clones_share_the_same_jar() {
        let jar = InMemoryJar::new();
        let handle = jar.clone();
        handle.write("a=1");
        assert_that!(jar.read(), eq("a=1"));

        jar.clear();
        assert_that!(handle.read(), eq(""));
    }

    #[test]
    fn shared_jars_are_jars_too() {
        let jar = Rc::new(InMemoryJar::new());
        let handle: Box<dyn AmbientJar> = Box::new(Rc::clone(&jar));
        handle.write("a=1");
        assert_that!(jar.read(), eq("a=1"));

        jar.write("b=2");
        assert_that!(handle.read(), eq("a=1; b=2"));
    }
}
