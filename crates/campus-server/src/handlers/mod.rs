//! Request handlers, one module per resource.
//!
//! Every handler is generic over the store; authorization runs before any
//! store call, and store errors are folded into the domain taxonomy by
//! [`crate::error::store_err`].

pub mod catalog;
pub mod enrollment;
pub mod grades;
pub mod lifecycle;
pub mod persons;
pub mod registration;
pub mod session;
pub mod students;
