use teloxide::types::{ChatId, UserId};
use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bot_token must not be empty".to_string(),
            ));
        }
        if self.owner_id == 0 {
            return Err(ConfigError::Validation(
                "owner_id must be a positive integer".to_string(),
            ));
        }
        if self.scan_interval == 0 {
            return Err(ConfigError::Validation(
                "scan_interval must be greater than 0".to_string(),
            ));
        }
        if self.status_report_interval == 0 {
            return Err(ConfigError::Validation(
                "status_report_interval must be greater than 0".to_string(),
            ));
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "command_timeout_secs must be greater than 0".to_string(),
            ));
        }
        validate_percentage("alerts.cpu", self.alerts.cpu)?;
        validate_percentage("alerts.ram", self.alerts.ram)?;
        validate_percentage("alerts.swap", self.alerts.swap)?;
        validate_percentage("alerts.disk", self.alerts.disk)?;
        if self.alerts.temperature.is_nan() || !(0.0..=150.0).contains(&self.alerts.temperature) {
            return Err(ConfigError::Validation(
                "alerts.temperature must be between 0 and 150".to_string(),
            ));
        }
        if self.alerts.hysteresis.is_nan() || self.alerts.hysteresis.is_sign_negative() {
            return Err(ConfigError::Validation(
                "alerts.hysteresis must be non-negative".to_string(),
            ));
        }
        if self.alerts.temperature_hysteresis.is_nan()
            || self.alerts.temperature_hysteresis.is_sign_negative()
        {
            return Err(ConfigError::Validation(
                "alerts.temperature_hysteresis must be non-negative".to_string(),
            ));
        }
        for service in &self.alerts.services {
            if service.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "alerts.services entries must not be empty".to_string(),
                ));
            }
        }
        for container in &self.alerts.containers {
            if container.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "alerts.containers entries must not be empty".to_string(),
                ));
            }
        }
        if self.live.tick_secs == 0 {
            return Err(ConfigError::Validation(
                "live.tick_secs must be greater than 0".to_string(),
            ));
        }
        if self.live.update_budget == 0 {
            return Err(ConfigError::Validation(
                "live.update_budget must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn owner_chat_id(&self) -> Result<ChatId, ConfigError> {
        let chat_id = i64::try_from(self.owner_id).map_err(|_| {
            ConfigError::Validation("owner_id is too large to fit a Telegram chat id".to_string())
        })?;
        Ok(ChatId(chat_id))
    }

    pub fn owner_user_id(&self) -> UserId {
        UserId(self.owner_id)
    }
}

fn validate_percentage(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_nan() || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}
