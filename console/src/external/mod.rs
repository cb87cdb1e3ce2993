//! Remote service clients

pub mod api;
pub mod auth;
pub mod directory;
pub mod ledger;

pub use api::ApiClient;
pub use auth::{AuthClient, Credentials};
pub use directory::{DirectoryApi, DirectoryClient};
pub use ledger::{LedgerApi, LedgerClient};
