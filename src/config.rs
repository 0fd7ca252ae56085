use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

/// Runtime configuration for the rendering/sending layer, read once from
/// the environment (a `.env` file is honored when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telegram's hard cap on message length; split parts never exceed it.
    pub max_message_length: usize,

    /// When true, every outgoing send/edit attempt is written as a JSON
    /// record for formatting forensics.
    pub enable_message_logging: bool,

    /// Root directory for the message log records.
    pub message_log_dir: String,
}

fn get_env_var_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    dotenv().ok();

    let max_message_length = get_env_var_default("MAX_MESSAGE_LENGTH", "4096")
        .parse::<usize>()
        .unwrap_or_else(|_| {
            log::warn!("Invalid MAX_MESSAGE_LENGTH, using 4096");
            4096
        });

    let enable_message_logging = matches!(
        get_env_var_default("ENABLE_MESSAGE_LOGGING", "false").as_str(),
        "1" | "true" | "yes"
    );

    AppConfig {
        max_message_length,
        enable_message_logging,
        message_log_dir: get_env_var_default("MESSAGE_LOG_DIR", "message_logs"),
    }
});
