mod sync_service;
mod sync_service_impl;
mod sync_service_resync_task;

pub use sync_service::*;
pub use sync_service_impl::*;
pub use sync_service_resync_task::*;
