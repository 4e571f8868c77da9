//! Cartwright Test Harness Library
//!
//! Building blocks for end-to-end suites against a demo storefront and its
//! public user API.
//!
//! # Features
//!
//! - **Order Text Parsing**: Extract numbers and order details from UI text
//! - **Tracked Cleanup**: Register created resources, delete them all at teardown
//! - **User API Client**: Thin CRUD client that exposes raw status and body
//! - **Env Config**: `.env`-aware settings for base URL, token and timeouts
//!
//! # Example
//!
//! ```no_run
//! use cartwright::{api::UserApi, cleanup::with_cleanup, config::Settings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let api = UserApi::from_settings(&settings)?;
//!
//!     let (_, report) = with_cleanup(&api, |tracker| async move {
//!         // create resources, track their ids, assert on responses
//!         tracker.track(12345);
//!     })
//!     .await;
//!     assert!(report.is_clean());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cleanup;
pub mod config;
pub mod extract;

// Re-export commonly used types
pub use api::{ApiResponse, User, UserApi, UserDraft};
pub use cleanup::{with_cleanup, CleanupReport, ResourceDeleter, ResourceTracker};
pub use config::Settings;
pub use extract::{extract_number, OrderDetails};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
