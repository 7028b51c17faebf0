mod error;
mod store;

pub use error::TaskStoreError;
pub use store::{Reservation, TaskStore};
