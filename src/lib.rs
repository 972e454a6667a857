//! One cookie API for code that runs both in the browser and on the server.
//!
//! # Overview
//!
//! In the browser, cookies are a live, ambient, string-encoded property
//! (`document.cookie`). On the server, they are a snapshot taken from the
//! `Cookie` header of the request being handled, and every change must be sent
//! back to the client with a `Set-Cookie` header.
//!
//! `cantucci` hides that difference behind [`CookieStore`]:
//!
//! - [`CookieStore::get`] and [`CookieStore::get_all`] to read cookies
//! - [`CookieStore::set`] and [`CookieStore::remove`] to change them
//!
//! The wire format is handled by the [`codec`] module, which you can also use
//! on its own.
//!
//! # Non-goals
//!
//! `cantucci` doesn't manage sessions and doesn't sign or encrypt cookie values.
//! On the server, it doesn't write to the response either: it hands every
//! `Set-Cookie` header value to the [`CookieHooks`] you provide.
//!
//! # Quickstart
//!
//! ## On the server
//!
//! ```rust
//! use cantucci::{CookieOptions, CookieStore, SetCookieCollector};
//! use cantucci::time::Duration;
//!
//! // One store per incoming request, built out of its `Cookie` header.
//! let collector = SetCookieCollector::new();
//! let mut store = CookieStore::with_hooks(
//!     "session=abc; theme=dark%20blue",
//!     collector.clone(),
//! ).unwrap();
//!
//! assert_eq!(store.get("theme").as_deref(), Some("dark blue"));
//!
//! let options = CookieOptions::new()
//!     .set_max_age(Duration::days(7))
//!     .set_http_only(true);
//! store.set("session", "xyz", &options).unwrap();
//! store.remove("theme", &CookieOptions::new()).unwrap();
//!
//! // Every value must be sent to the client in its own `Set-Cookie` header.
//! assert_eq!(
//!     collector.take(),
//!     vec![
//!         "session=xyz; HttpOnly; Path=/; Max-Age=604800".to_string(),
//!         "theme=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT".to_string(),
//!     ]
//! );
//! ```
//!
//! ## In the browser
//!
//! Compile for `wasm32` with the `browser` feature enabled:
//! [`CookieStore::new`] detects `document.cookie` and uses it as its jar.
//!
//! ```rust,ignore
//! use cantucci::{CookieOptions, CookieStore};
//!
//! let mut store = CookieStore::new().unwrap();
//! store.set("theme", "dark", &CookieOptions::new()).unwrap();
//! assert_eq!(store.get("theme").as_deref(), Some("dark"));
//! ```
//!
//! Outside of a browser, [`Environment::browser`] together with
//! [`jar::InMemoryJar`] gives you the same behaviour on top of an
//! in-process jar.
//!
//! ## Credits
//!
//! The cookie formatting and percent-encoding logic comes from
//! [`biscotti`](https://crates.io/crates/biscotti), itself a fork of the
//! [`cookie` crate](https://crates.io/crates/cookie) [Copyright (c) 2017 Sergio Benitez,
//! Copyright (c) 2014 Alex Crichton].

pub mod codec;
mod cookie_map;
mod encoding;
mod environment;
mod hooks;
pub mod jar;
mod options;
mod same_site;
mod store;

pub use crate::same_site::*;
pub use cookie_map::{CookieMap, CookieMapIter};
pub use environment::Environment;
pub use hooks::{CookieHooks, Hooks, SetCookieCollector};
pub use options::CookieOptions;
pub use store::{CookieSource, CookieStore, Mode, StoreBuilder};
pub use time;

/// Errors that can occur when using `cantucci`.
pub mod errors {
    pub use crate::codec::InvalidOptionError;
    #[cfg(feature = "serde")]
    pub use crate::store::SetJsonError;
    pub use crate::store::{EnvironmentError, MissingSourceError, StoreError};
}
