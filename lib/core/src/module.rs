use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (auth, feed, ...) implements this trait to
/// register its API endpoints. The binary entry point collects all
/// modules and mounts their routes into a single Router.
pub trait Module: Send + Sync {
    /// Module name, used for logging and route prefixes.
    fn name(&self) -> &str;

    /// Return the module's routes. Paths are relative; the binary
    /// decides where to mount them.
    fn routes(&self) -> Router;
}
