pub mod config;
pub mod error;
pub mod gate;
pub mod io;
pub mod paths;
pub mod roadmap;
pub mod types;

pub use error::{CoddyError, Result};
