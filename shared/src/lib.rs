pub mod config;
pub mod input;
pub mod snapshot;

pub use config::*;
pub use input::*;
pub use snapshot::*;
