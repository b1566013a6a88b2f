use std::path::PathBuf;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub verification_key_path: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            verification_key_path: PathBuf::from("./build/verification_key.json"),
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Config::default();

        Ok(Config {
            server_host: std::env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: match std::env::var("SERVER_PORT").or_else(|_| std::env::var("PORT")) {
                Ok(port) => port
                    .parse()
                    .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?,
                Err(_) => defaults.server_port,
            },
            verification_key_path: std::env::var("VERIFICATION_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.verification_key_path),
            request_timeout_secs: match std::env::var("REQUEST_TIMEOUT_SECS") {
                Ok(secs) => secs
                    .parse()
                    .map_err(|e| AppError::Config(format!("Invalid REQUEST_TIMEOUT_SECS: {}", e)))?,
                Err(_) => defaults.request_timeout_secs,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
