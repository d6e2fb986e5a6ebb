//! Data Transfer Objects for the web surface.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
