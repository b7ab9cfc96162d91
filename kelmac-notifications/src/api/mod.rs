//!
//! Module with the client of the notifications REST backend
//!

mod dto;
mod error;
mod notifications_api;
mod notifications_api_impl;

pub use dto::NotificationsApiConfig;
pub use error::Error;
pub use notifications_api::*;
pub use notifications_api_impl::*;
