/// Tabular learning algorithms
pub mod algo;

/// Training configuration
pub mod config;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Grid environments
pub mod gym;

/// Episode loop and progress reporting
pub mod train;

mod util;

pub use config::{Pacing, TrainerConfig};
pub use error::{Error, Result};
pub use train::{Phase, StopHandle, Trainer};
