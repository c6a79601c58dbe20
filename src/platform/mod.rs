//! Host services the session client drives: credential persistence and
//! screen navigation.

pub mod credentials;
pub mod navigation;

pub use credentials::*;
pub use navigation::*;
