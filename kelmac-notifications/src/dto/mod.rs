//!
//! Module with all dtos received from the push server and the REST backend
//!

pub mod input;
