pub mod types;
pub mod settings;
pub mod error;
pub mod events;
#[cfg(feature = "desktop")]
pub mod emit;
#[cfg(feature = "desktop")]
pub mod logging;

pub use error::{AppError, AppResult};
