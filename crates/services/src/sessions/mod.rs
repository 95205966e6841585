mod progress;
mod review;

// Public API of the session subsystem.
pub use crate::error::ReviewSessionError;
pub use progress::SessionProgress;
pub use review::{ReviewAnswer, ReviewSession};
