//! Admin session implementations.

mod local;

pub use local::{LocalAuthConfig, LocalSessions};

#[cfg(feature = "http")]
mod remote;
#[cfg(feature = "http")]
pub use remote::{RemoteAuthConfig, RemoteSessions};
