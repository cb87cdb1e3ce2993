//! Shared types and pure logic for the Beverage Distribution Console
//!
//! Invoice intake, stock valuation and submission rules used by the console
//! services and, through WASM, by the browser views. Nothing in this crate
//! performs I/O.

pub mod editor;
pub mod models;
pub mod types;
pub mod validation;
pub mod valuation;
pub mod workflow;

pub use editor::*;
pub use models::*;
pub use types::*;
pub use validation::*;
pub use valuation::*;
pub use workflow::*;
