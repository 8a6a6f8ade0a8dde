pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use config::Config;
pub use error::DispatchError;
pub use geometry::{distance, Location};
pub use types::*;
