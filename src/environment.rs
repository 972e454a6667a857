use crate::jar::AmbientJar;
use std::fmt;

/// Where a [`CookieStore`] runs.
///
/// The environment is decided once, when the store is built, and never
/// re-evaluated afterwards.
///
/// [`CookieStore`]: crate::CookieStore
pub enum Environment {
    /// An ambient cookie jar is available (e.g. `document.cookie`).
    Browser(Box<dyn AmbientJar>),
    /// No ambient jar: cookies come from the incoming request.
    Server,
}

impl Environment {
    /// Detects the current environment.
    ///
    /// It returns [`Environment::Browser`], backed by `document.cookie`, when
    /// compiled for `wasm32` with the `browser` feature and running inside a
    /// browsing context. It returns [`Environment::Server`] otherwise.
    pub fn detect() -> Environment {
        match ambient_jar() {
            Some(jar) => Environment::Browser(jar),
            None => Environment::Server,
        }
    }

    /// A browser environment backed by `jar`.
    ///
    /// ```rust
    /// use cantucci::Environment;
    /// use cantucci::jar::InMemoryJar;
    ///
    /// let environment = Environment::browser(InMemoryJar::new());
    /// assert!(environment.is_browser());
    /// ```
    pub fn browser<J>(jar: J) -> Environment
    where
        J: AmbientJar + 'static,
    {
        Environment::Browser(Box::new(jar))
    }

    pub fn is_browser(&self) -> bool {
        matches!(self, Environment::Browser(_))
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Environment::Server)
    }
}

#[cfg(all(target_arch = "wasm32", feature = "browser"))]
fn ambient_jar() -> Option<Box<dyn AmbientJar>> {
    let jar = crate::jar::DocumentJar::new()?;
    Some(Box::new(jar))
}

#[cfg(not(all(target_arch = "wasm32", feature = "browser")))]
fn ambient_jar() -> Option<Box<dyn AmbientJar>> {
    None
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Browser(_) => f.write_str("Browser"),
            Environment::Server => f.write_str("Server"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Environment;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_targets_run_in_server_mode() {
        assert!(Environment::detect().is_server());
    }
}
