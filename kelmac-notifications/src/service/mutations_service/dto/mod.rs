mod mutations_service_config;

pub use mutations_service_config::MutationsServiceConfig;
