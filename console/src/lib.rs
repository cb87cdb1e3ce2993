//! Beverage Distribution Console
//!
//! Client side of invoice intake and stock valuation: remote clients for
//! the ledger, product directory and auth service, plus the services that
//! hold the invoice-entry and manual-exit compositions.

pub mod config;
pub mod drafts;
pub mod error;
pub mod external;
pub mod services;

pub use config::Config;
pub use error::{ConsoleError, ConsoleResult};
