//! Domain models for the distribution console

mod directory;
mod exit;
mod invoice;
mod line_item;
mod movement;
mod session;
mod stock;

pub use directory::*;
pub use exit::*;
pub use invoice::*;
pub use line_item::*;
pub use movement::*;
pub use session::*;
pub use stock::*;
