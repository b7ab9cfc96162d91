pub mod api;
pub mod application;
pub mod dto;
pub mod error;
pub mod model;
pub mod service;
