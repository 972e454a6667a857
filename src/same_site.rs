use std::fmt;

/// The `SameSite` cookie attribute.
///
/// It restricts when a cookie is sent along with cross-site requests:
///
/// - `Strict`: the cookie is never sent in cross-site requests.
/// - `Lax`: the cookie is only sent in cross-site top-level navigations
///   using "safe" HTTP methods (e.g. `GET`).
/// - `None`: the cookie is sent in all cross-site requests, as long as it is
///   also marked as `Secure`. Browsers discard `SameSite=None` cookies that
///   are not `Secure`.
///
/// If the attribute is not set (see [`CookieOptions::set_same_site()`]), the
/// user agent applies its own default.
///
/// [`CookieOptions::set_same_site()`]: crate::CookieOptions::set_same_site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SameSite {
    /// The "Strict" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "strict"))]
    Strict,
    /// The "Lax" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "lax"))]
    Lax,
    /// The "None" `SameSite` attribute.
    #[cfg_attr(feature = "serde", serde(alias = "none"))]
    None,
}

impl SameSite {
    /// Returns `true` if `self` is `SameSite::Strict`.
    ///
    /// ```rust
    /// use cantucci::SameSite;
    ///
    /// assert!(SameSite::Strict.is_strict());
    /// assert!(!SameSite::Lax.is_strict());
    /// ```
    #[inline]
    pub fn is_strict(&self) -> bool {
        matches!(self, SameSite::Strict)
    }

    /// Returns `true` if `self` is `SameSite::Lax`.
    #[inline]
    pub fn is_lax(&self) -> bool {
        matches!(self, SameSite::Lax)
    }

    /// Returns `true` if `self` is `SameSite::None`.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, SameSite::None)
    }

    /// The value of the attribute, as it appears in a `Set-Cookie` header.
    pub fn as_str(&self) -> &'static str {
        match *self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::SameSite;
    use googletest::prelude::*;

    #[derive(serde::Deserialize)]
    struct Wrapper {
        same_site: SameSite,
    }

    #[test]
    fn deserializes_both_casings() {
        for (raw, expected) in [
            ("Strict", SameSite::Strict),
            ("strict", SameSite::Strict),
            ("Lax", SameSite::Lax),
            ("lax", SameSite::Lax),
            ("None", SameSite::None),
            ("none", SameSite::None),
        ] {
            let json = format!(r#"{{"same_site": "{raw}"}}"#);
            let w: Wrapper = serde_json::from_str(&json).unwrap();
            assert_that!(w.same_site, eq(expected));
        }
    }
}
