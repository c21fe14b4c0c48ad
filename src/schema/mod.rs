//! Schema document model and loading.
mod load;
mod types;

pub use load::*;
pub use types::*;
