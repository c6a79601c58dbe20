//! The application store: actions, the reducer over [`AppState`], and
//! operation errors.

pub mod actions;
pub mod error;
mod reducer;

pub use actions::*;
pub use error::*;

use crate::framework::{StoreActor, StoreClient};
use crate::model::AppState;

/// Creates the application store actor and its client.
pub fn new(buffer_size: usize) -> (StoreActor<AppState>, StoreClient<AppState>) {
    StoreActor::new(buffer_size)
}
