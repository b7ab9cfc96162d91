mod dto;
mod mutations_service;
mod mutations_service_impl;

pub use dto::MutationsServiceConfig;
pub use mutations_service::*;
pub use mutations_service_impl::*;
