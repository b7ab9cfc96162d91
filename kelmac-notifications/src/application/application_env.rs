use anyhow::anyhow;
use std::time::Duration;

pub struct ApplicationEnv {
    pub log_directory: String,
    pub log_filename: String,
    /// `EnvFilter` directives of the log file, independent from `RUST_LOG`
    pub log_file_filter: String,

    /// Id of the user whose notifications are kept in sync
    pub recipient_id: String,

    pub websocket_url: String,
    pub api_base_url: String,
    pub request_timeout: Duration,

    pub reconnect_base_delay: Duration,
    pub reconnect_max_delay: Duration,
    pub reconnect_max_attempts: u32,

    pub tombstone_lifespan: Duration,
    pub garbage_collector_interval: Duration,
}

impl ApplicationEnv {
    pub fn parse() -> anyhow::Result<Self> {
        let log_directory = Self::env_var("KELMAC_NOTIFICATIONS_LOG_DIRECTORY")?;
        let log_filename = Self::env_var("KELMAC_NOTIFICATIONS_LOG_FILENAME")?;
        let log_file_filter = Self::env_var_or(
            "KELMAC_NOTIFICATIONS_LOG_FILE_FILTER",
            "kelmac_notifications=debug,socket_client=debug",
        );
        let recipient_id = Self::env_var("KELMAC_NOTIFICATIONS_RECIPIENT_ID")?;
        if recipient_id.trim().is_empty() {
            anyhow::bail!("KELMAC_NOTIFICATIONS_RECIPIENT_ID cannot be empty");
        }
        let websocket_url =
            Self::env_var_or("KELMAC_NOTIFICATIONS_WEBSOCKET_URL", "http://localhost:3001");
        let api_base_url =
            Self::env_var_or("KELMAC_NOTIFICATIONS_API_BASE_URL", "http://localhost:5000");
        let request_timeout = Self::env_var_or("KELMAC_NOTIFICATIONS_REQUEST_TIMEOUT", "10")
            .parse::<u64>()
            .map_err(|err| anyhow!("KELMAC_NOTIFICATIONS_REQUEST_TIMEOUT: {err}"))?;
        let request_timeout = Duration::from_secs(request_timeout);
        let reconnect_base_delay =
            Self::env_var_or("KELMAC_NOTIFICATIONS_RECONNECT_BASE_DELAY", "1000")
                .parse::<u64>()
                .map_err(|err| anyhow!("KELMAC_NOTIFICATIONS_RECONNECT_BASE_DELAY: {err}"))?;
        let reconnect_base_delay = Duration::from_millis(reconnect_base_delay);
        let reconnect_max_delay =
            Self::env_var_or("KELMAC_NOTIFICATIONS_RECONNECT_MAX_DELAY", "5000")
                .parse::<u64>()
                .map_err(|err| anyhow!("KELMAC_NOTIFICATIONS_RECONNECT_MAX_DELAY: {err}"))?;
        let reconnect_max_delay = Duration::from_millis(reconnect_max_delay);
        let reconnect_max_attempts =
            Self::env_var_or("KELMAC_NOTIFICATIONS_RECONNECT_MAX_ATTEMPTS", "5")
                .parse::<u32>()
                .map_err(|err| anyhow!("KELMAC_NOTIFICATIONS_RECONNECT_MAX_ATTEMPTS: {err}"))?;
        let tombstone_lifespan =
            Self::env_var_or("KELMAC_NOTIFICATIONS_TOMBSTONE_LIFESPAN", "3600")
                .parse::<u64>()
                .map_err(|err| anyhow!("KELMAC_NOTIFICATIONS_TOMBSTONE_LIFESPAN: {err}"))?;
        let tombstone_lifespan = Duration::from_secs(tombstone_lifespan);
        let garbage_collector_interval =
            Self::env_var_or("KELMAC_NOTIFICATIONS_GARBAGE_COLLECTOR_INTERVAL", "60")
                .parse::<u64>()
                .map_err(|err| {
                    anyhow!("KELMAC_NOTIFICATIONS_GARBAGE_COLLECTOR_INTERVAL: {err}")
                })?;
        let garbage_collector_interval = Duration::from_secs(garbage_collector_interval);
        if garbage_collector_interval.is_zero() {
            anyhow::bail!("KELMAC_NOTIFICATIONS_GARBAGE_COLLECTOR_INTERVAL must be positive");
        }

        Ok(Self {
            log_directory,
            log_filename,
            log_file_filter,
            recipient_id,
            websocket_url,
            api_base_url,
            request_timeout,
            reconnect_base_delay,
            reconnect_max_delay,
            reconnect_max_attempts,
            tombstone_lifespan,
            garbage_collector_interval,
        })
    }

    fn env_var(name: &'static str) -> anyhow::Result<String> {
        std::env::var(name).map_err(|_| anyhow!("environment variable {name} not set"))
    }

    fn env_var_or(name: &'static str, default: &str) -> String {
        std::env::var(name).unwrap_or_else(|_| default.to_string())
    }
}
