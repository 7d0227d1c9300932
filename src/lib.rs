//! ClassHub client - session management and authenticated requests for the
//! ClassHub classroom API.
//!
//! The crate centers on two cooperating pieces:
//! - [`SessionStore`]: the single holder of the bearer credential, backed by
//!   durable key/value storage
//! - [`ApiClient`]: the request pipeline every authenticated call flows
//!   through, normalizing each outcome into an [`ApiResponse`]
//!
//! Around them sit the route [`guard`] (presence check at navigation time)
//! and the storage integrity [`sweep`](storage::sweep) (run once at process
//! start to purge malformed entries).
//!
//! ```no_run
//! use std::sync::Arc;
//! use classhub_client::{ApiClient, Config, FileStorage, SessionStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let storage = Arc::new(FileStorage::new(config.storage_dir()?)?);
//! classhub_client::storage::sweep(storage.as_ref());
//!
//! let session = SessionStore::new(storage);
//! let client = ApiClient::new(&config, session)?
//!     .on_session_invalidated(|| { /* navigate to the login page */ });
//!
//! let response = client.login("teacher@gmail.com", "secret").await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod route;
pub mod storage;

pub use api::{ApiClient, ApiError, ApiResponse, Registration, RequestOptions, ResponseBody};
pub use auth::SessionStore;
pub use config::Config;
pub use route::{guard, RouteOutcome, LOGIN_PATH};
pub use storage::{FileStorage, MemoryStorage, Storage};
