//! Data model of a Safe creation attempt

mod params;
mod pending;
mod status;

pub use params::SafeCreationParams;
pub use pending::{PendingCreation, PendingCreationTx};
pub use status::CreationStatus;
