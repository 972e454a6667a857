//! Conversions between the cookie wire format and structured values.
//!
//! - [`parse`] turns a `Cookie` header (or `document.cookie`) into a [`CookieMap`].
//! - [`serialize`] turns a name, a value and [`CookieOptions`] into a
//!   `Set-Cookie`-style attribute string.
//! - [`serialize_removal`] builds the attribute string that instructs a user
//!   agent to delete a cookie.
//!
//! All functions are pure: they never touch a cookie jar.
use crate::encoding::{decode, encode};
use crate::{CookieMap, CookieOptions};
use std::fmt;
use time::format_description::FormatItem;
use time::macros::{datetime, format_description};
use time::{Duration, OffsetDateTime, UtcOffset};

/// From http://tools.ietf.org/html/rfc2616#section-3.3.1.
pub(crate) static HTTP_DATE: &[FormatItem<'_>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year padding:none] [hour]:[minute]:[second] GMT"
);

/// RFC 6265 requires dates not to exceed 9999 years.
static MAX_DATETIME: OffsetDateTime = datetime!(9999-12-31 23:59:59.999_999 UTC);

/// Parse a cookie header value into a [`CookieMap`].
///
/// Parsing is best-effort: fragments without a `=` or with an empty name are
/// skipped, and values that can't be percent-decoded are kept as they are.
/// If the same name appears more than once, the last occurrence wins.
///
/// ```rust
/// use cantucci::codec::parse;
///
/// let cookies = parse("name=first%20value; garbage; name2=val");
/// assert_eq!(cookies.get("name"), Some("first value"));
/// assert_eq!(cookies.get("name2"), Some("val"));
/// assert_eq!(cookies.len(), 2);
/// ```
pub fn parse(header: &str) -> CookieMap {
    let mut cookies = CookieMap::new();
    for fragment in header.split(';') {
        if fragment.chars().all(char::is_whitespace) {
            continue;
        }

        let Some((name, value)) = fragment.split_once('=') else {
            log::trace!("Skipping `{fragment}`: no name-value separator");
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            log::trace!("Skipping `{fragment}`: the cookie name is empty");
            continue;
        }

        let value = trim_quotes(value.trim());
        // A name that can't be written back once decoded is kept as it is.
        let decoded = decode(name);
        let name = match validate_name(&decoded) {
            Ok(()) => decoded,
            Err(_) => {
                log::trace!("Keeping the `{name}` cookie name as is: it decodes to `{decoded}`");
                name.into()
            }
        };
        cookies.insert(name, decode(value));
    }
    cookies
}

/// Serialize a cookie write into a `Set-Cookie`-style attribute string.
///
/// Name and value are percent-encoded. Attributes that are not set in
/// `options` are omitted from the output.
///
/// ```rust
/// use cantucci::{codec::serialize, CookieOptions, SameSite};
///
/// let options = CookieOptions::new().set_http_only(true).set_same_site(SameSite::Lax);
/// let cookie = serialize("name", "a value", &options).unwrap();
/// assert_eq!(cookie, "name=a%20value; HttpOnly; SameSite=Lax; Path=/");
/// ```
///
/// # Errors
///
/// It fails if the name is empty or contains characters that would corrupt the
/// header (`;`, `=`, control characters), or if `path`/`domain` contain `;`
/// or control characters.
pub fn serialize(
    name: &str,
    value: &str,
    options: &CookieOptions,
) -> Result<String, InvalidOptionError> {
    validate_name(name)?;
    if let Some(path) = options.path() {
        validate_attribute("Path", path)?;
    }
    if let Some(domain) = options.domain() {
        validate_attribute("Domain", domain)?;
    }
    Ok(SetCookie {
        name,
        value,
        options,
    }
    .to_string())
}

/// Serialize the attribute string that removes the cookie named `name`.
///
/// The value is emptied, `Max-Age` is set to zero and `Expires` to the Unix
/// epoch. `path` and `domain` must match those used when the cookie was set,
/// otherwise the user agent won't delete it.
///
/// ```rust
/// use cantucci::{codec::serialize_removal, CookieOptions};
///
/// let removal = serialize_removal("name", &CookieOptions::new()).unwrap();
/// assert_eq!(
///     removal,
///     "name=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
/// );
/// ```
pub fn serialize_removal(name: &str, options: &CookieOptions) -> Result<String, InvalidOptionError> {
    let options = options
        .clone()
        .set_max_age(Duration::ZERO)
        .set_expires(OffsetDateTime::UNIX_EPOCH);
    serialize(name, "", &options)
}

/// Check that `name` can be used as a cookie name without corrupting
/// adjacent attributes.
pub fn validate_name(name: &str) -> Result<(), InvalidOptionError> {
    if name.is_empty() {
        return Err(InvalidOptionError::EmptyName);
    }
    if let Some(character) = name.chars().find(|&c| c.is_control() || c == ';' || c == '=') {
        return Err(InvalidOptionError::InvalidNameCharacter {
            name: name.to_string(),
            character,
        });
    }
    Ok(())
}

fn validate_attribute(attribute: &'static str, value: &str) -> Result<(), InvalidOptionError> {
    if value.chars().any(|c| c.is_control() || c == ';') {
        return Err(InvalidOptionError::InvalidAttributeValue {
            attribute,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
/// The error returned when a cookie write can't be serialized safely.
///
/// It is returned by [`serialize`], [`serialize_removal`] and by the
/// write operations on [`CookieStore`].
///
/// [`CookieStore`]: crate::CookieStore
pub enum InvalidOptionError {
    #[error("The name of a cookie cannot be empty")]
    EmptyName,
    #[error("`{name}` is not a valid cookie name: it contains the forbidden character `{}`", .character.escape_debug())]
    InvalidNameCharacter { name: String, character: char },
    #[error("`{value}` is not a valid value for the `{attribute}` attribute")]
    InvalidAttributeValue {
        attribute: &'static str,
        value: String,
    },
}

fn trim_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

/// A validated cookie write, formatted as a `Set-Cookie` header value.
struct SetCookie<'a> {
    name: &'a str,
    value: &'a str,
    options: &'a CookieOptions,
}

impl SetCookie<'_> {
    fn fmt_parameters(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let options = self.options;
        if options.http_only() {
            write!(f, "; HttpOnly")?;
        }

        if let Some(same_site) = options.same_site() {
            write!(f, "; SameSite={}", same_site)?;
        }

        if options.secure() {
            write!(f, "; Secure")?;
        }

        if let Some(path) = options.path() {
            write!(f, "; Path={}", path)?;
        }

        if let Some(domain) = options.domain() {
            write!(f, "; Domain={}", domain)?;
        }

        if let Some(max_age) = options.max_age() {
            write!(f, "; Max-Age={}", max_age.whole_seconds())?;
        }

        if let Some(time) = options.expires() {
            // Any past date expires the cookie, so it's clamped to the epoch.
            let time = time
                .clamp(OffsetDateTime::UNIX_EPOCH, MAX_DATETIME)
                .to_offset(UtcOffset::UTC);
            write!(
                f,
                "; Expires={}",
                time.format(&HTTP_DATE).map_err(|_| fmt::Error)?
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for SetCookie<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", encode(self.name), encode(self.value))?;
        self.fmt_parameters(f)
    }
}
