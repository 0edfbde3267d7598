use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: String,
    pub redis_connect_timeout: Duration,
    /// Interval between background PINGs; `None` disables the heartbeat.
    pub redis_heartbeat: Option<Duration>,
    pub service_port: u16,
    pub service_host: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redis_host = lookup("REDIS_HOST").unwrap_or_else(|| "localhost".to_string());

        let redis_port = parse_var(&lookup, "REDIS_PORT", 6379u16)
            .context("REDIS_PORT must be a valid port number (0-65535)")?;

        let redis_password = lookup("REDIS_PASSWORD").unwrap_or_default();

        let connect_timeout_ms = parse_var(&lookup, "REDIS_CONNECT_TIMEOUT_MS", 5000u64)
            .context("REDIS_CONNECT_TIMEOUT_MS must be a number of milliseconds")?;

        let heartbeat_secs = parse_var(&lookup, "REDIS_HEARTBEAT_SECS", 5u64)
            .context("REDIS_HEARTBEAT_SECS must be a number of seconds")?;

        let service_port = parse_var(&lookup, "PORT", 3000u16)
            .context("PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        Ok(Config {
            redis_host,
            redis_port,
            redis_password,
            redis_connect_timeout: Duration::from_millis(connect_timeout_ms),
            redis_heartbeat: (heartbeat_secs > 0).then(|| Duration::from_secs(heartbeat_secs)),
            service_port,
            service_host,
        })
    }

    /// Connection URL without credentials; the password is applied separately.
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.redis_host, self.redis_port)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service_host, self.service_port)
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Redis: {}:{}", self.redis_host, self.redis_port);
        tracing::info!(
            "  Redis password: {}",
            if self.redis_password.is_empty() { "not set" } else { "set" }
        );
        tracing::info!("  Redis connect timeout: {:?}", self.redis_connect_timeout);
        match self.redis_heartbeat {
            Some(interval) => tracing::info!("  Redis heartbeat: every {:?}", interval),
            None => tracing::info!("  Redis heartbeat: disabled"),
        }
        tracing::info!("  Service listening on: {}", self.bind_address());
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: '{}'", name, raw)),
        None => Ok(default),
    }
}
