use crate::SameSite;
use time::{Duration, OffsetDateTime};

/// The attributes attached to a cookie when it is written.
///
/// Only the attributes that are set end up in the serialized `Set-Cookie`
/// string; unset attributes are omitted rather than emitted with a default.
/// The only exception is `path`, which defaults to `/`.
///
/// ```rust
/// use cantucci::{CookieOptions, SameSite};
/// use cantucci::time::Duration;
///
/// let options = CookieOptions::new()
///     .set_domain("rust-lang.org")
///     .set_max_age(Duration::hours(1))
///     .set_secure(true)
///     .set_same_site(SameSite::Lax);
///
/// assert_eq!(options.path(), Some("/"));
/// assert_eq!(options.domain(), Some("rust-lang.org"));
/// assert_eq!(options.max_age(), Some(Duration::hours(1)));
/// assert!(options.secure());
/// assert!(!options.http_only());
/// ```
///
/// # Removal
///
/// A cookie is identified by its name, path and domain.
/// To remove a cookie, the path and domain passed to [`CookieStore::remove()`]
/// must match the ones used when the cookie was set, otherwise the user agent
/// leaves the original cookie untouched.
///
/// [`CookieStore::remove()`]: crate::CookieStore::remove
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CookieOptions {
    pub(crate) path: Option<String>,
    pub(crate) domain: Option<String>,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339::option"))]
    pub(crate) expires: Option<OffsetDateTime>,
    #[cfg_attr(feature = "serde", serde(with = "max_age_seconds"))]
    pub(crate) max_age: Option<Duration>,
    pub(crate) secure: bool,
    pub(crate) http_only: bool,
    pub(crate) same_site: Option<SameSite>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        CookieOptions {
            path: Some("/".to_string()),
            domain: None,
            expires: None,
            max_age: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }
}

impl CookieOptions {
    /// Options with every attribute unset, except for `path` (`/`).
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the `Path` attribute, if set.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the `Domain` attribute, if set.
    ///
    /// A leading `.` is stripped, since user agents ignore it.
    ///
    /// ```rust
    /// use cantucci::CookieOptions;
    ///
    /// let options = CookieOptions::new().set_domain(".crates.io");
    /// assert_eq!(options.domain(), Some("crates.io"));
    /// ```
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(|domain| domain.strip_prefix('.').unwrap_or(domain))
    }

    /// Returns the `Expires` attribute, if set.
    #[inline]
    pub fn expires(&self) -> Option<OffsetDateTime> {
        self.expires
    }

    /// Returns the `Max-Age` attribute, if set.
    #[inline]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Whether the cookie is marked as `Secure`.
    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Whether the cookie is marked as `HttpOnly`.
    #[inline]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Returns the `SameSite` attribute, if set.
    #[inline]
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }
}

/// Builder-style setters.
impl CookieOptions {
    /// Sets the `Path` attribute.
    ///
    /// ```rust
    /// use cantucci::CookieOptions;
    ///
    /// let options = CookieOptions::new().set_path("/admin");
    /// assert_eq!(options.path(), Some("/admin"));
    /// ```
    pub fn set_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Removes the `Path` attribute, including the default `/`.
    pub fn unset_path(mut self) -> Self {
        self.path = None;
        self
    }

    /// Sets the `Domain` attribute.
    pub fn set_domain<D: Into<String>>(mut self, domain: D) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Removes the `Domain` attribute: the cookie is only sent to the host
    /// that set it.
    pub fn unset_domain(mut self) -> Self {
        self.domain = None;
        self
    }

    /// Sets the `Expires` attribute.
    ///
    /// If `Max-Age` is set as well, user agents give it precedence over `Expires`.
    pub fn set_expires<T: Into<Option<OffsetDateTime>>>(mut self, time: T) -> Self {
        self.expires = time.into();
        self
    }

    /// Sets the `Max-Age` attribute. It is serialized as a whole number of seconds.
    ///
    /// ```rust
    /// use cantucci::CookieOptions;
    /// use cantucci::time::Duration;
    ///
    /// let options = CookieOptions::new().set_max_age(Duration::minutes(2));
    /// assert_eq!(options.max_age(), Some(Duration::seconds(120)));
    ///
    /// let options = options.set_max_age(None);
    /// assert_eq!(options.max_age(), None);
    /// ```
    pub fn set_max_age<D: Into<Option<Duration>>>(mut self, value: D) -> Self {
        self.max_age = value.into();
        self
    }

    /// Marks the cookie as `Secure`: it is only sent over HTTPS.
    pub fn set_secure(mut self, value: bool) -> Self {
        self.secure = value;
        self
    }

    /// Marks the cookie as `HttpOnly`.
    ///
    /// Browsers refuse `HttpOnly` cookies written from scripts: the flag is
    /// only effective for cookies sent from the server in a `Set-Cookie` header.
    pub fn set_http_only(mut self, value: bool) -> Self {
        self.http_only = value;
        self
    }

    /// Sets the `SameSite` attribute.
    ///
    /// ```rust
    /// use cantucci::{CookieOptions, SameSite};
    ///
    /// let options = CookieOptions::new().set_same_site(SameSite::Strict);
    /// assert_eq!(options.same_site(), Some(SameSite::Strict));
    ///
    /// let options = options.set_same_site(None);
    /// assert_eq!(options.same_site(), None);
    /// ```
    pub fn set_same_site<T: Into<Option<SameSite>>>(mut self, value: T) -> Self {
        self.same_site = value.into();
        self
    }
}

#[cfg(feature = "serde")]
mod max_age_seconds {
    use serde::{Deserialize, Deserializer};
    use time::Duration;

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = Option::<i64>::deserialize(deserializer)?;
        Ok(seconds.map(Duration::seconds))
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use crate::{CookieOptions, SameSite};
    use googletest::prelude::*;
    use time::macros::datetime;
    use time::Duration;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: CookieOptions = serde_json::from_str("{}").unwrap();
        assert_that!(options, eq(CookieOptions::default()));
        assert_that!(options.path(), some(eq("/")));
    }

    #[test]
    fn deserializes_every_attribute() {
        let options: CookieOptions = serde_json::from_str(
            r#"{
                "path": "/admin",
                "domain": "example.com",
                "expires": "2015-10-21T07:28:00Z",
                "max_age": 3600,
                "secure": true,
                "http_only": true,
                "same_site": "strict"
            }"#,
        )
        .unwrap();

        assert_that!(options.path(), some(eq("/admin")));
        assert_that!(options.domain(), some(eq("example.com")));
        assert_that!(
            options.expires(),
            some(eq(datetime!(2015-10-21 07:28:00 UTC)))
        );
        assert_that!(options.max_age(), some(eq(Duration::hours(1))));
        assert_that!(options.secure(), eq(true));
        assert_that!(options.http_only(), eq(true));
        assert_that!(options.same_site(), some(eq(SameSite::Strict)));
    }

    #[test]
    fn path_can_be_explicitly_unset() {
        let options: CookieOptions = serde_json::from_str(r#"{"path": null}"#).unwrap();
        assert_that!(options.path(), none());
    }
}
