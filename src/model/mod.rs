//! Plain data: wire DTOs, the application state, and its render projection.

pub mod candidate;
pub mod criteria;
pub mod operation;
pub mod preferences;
pub mod state;
pub mod view;
pub mod viewer;

pub use candidate::*;
pub use criteria::*;
pub use operation::*;
pub use preferences::*;
pub use state::*;
pub use view::*;
pub use viewer::*;
