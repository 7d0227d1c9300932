//! Route guard: gate a protected view behind the session presence check.
//!
//! The guard is a pure function of the session store and performs no network
//! call. It does not react to mid-session expiry; that is the pipeline's job
//! via the 401 path.

use crate::auth::SessionStore;

/// Fixed unauthenticated entry point. The 401 teardown and the guard both
/// send the user here.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, PartialEq, Eq)]
pub enum RouteOutcome<V> {
    /// Render the protected view.
    Allow(V),
    /// Send the user to the login path instead.
    RedirectToLogin(&'static str),
}

pub fn guard<V>(session: &SessionStore, view: V) -> RouteOutcome<V> {
    if session.is_authenticated() {
        RouteOutcome::Allow(view)
    } else {
        RouteOutcome::RedirectToLogin(LOGIN_PATH)
    }
}
