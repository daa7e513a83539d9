use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr, time::Duration};

use tasting_survey_notify::{Mailbox, SmtpSettings};
use thiserror::Error;
use tracing::{info, warn};

use crate::controller::MailSettings;

/// Keys that are looked up in `/run/secrets` before the environment.
const SECRETS: [&str; 2] = ["MAIL_ADDRESS", "MAIL_PASSWORD"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing {0}: put it in /run/secrets/{0} or the environment")]
    Missing(String),

    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub catalog_path: PathBuf,
    pub assets_dir: PathBuf,
    pub smtp: SmtpSettings,
    pub mail: MailSettings,
}

impl Config {
    /// Read the process environment and `/run/secrets`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            if SECRETS.contains(&key) {
                read_secret(key).or_else(|| var(key))
            } else {
                var(key)
            }
        })
    }

    /// Build a config from any key lookup. Unset keys fall back to defaults;
    /// only the sender address and password are required.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let sender: Mailbox = require(&lookup, "MAIL_ADDRESS")?;
        let password: String = require(&lookup, "MAIL_PASSWORD")?;

        let sender_text = sender.email.to_string();
        let username: String = try_load(&lookup, "SMTP_USERNAME", &sender_text)?;
        let recipient: Mailbox = try_load(&lookup, "MAIL_RECIPIENT", &sender_text)?;
        let timeout_secs: u64 = try_load(&lookup, "SMTP_TIMEOUT_SECS", "20")?;

        let mut mail = MailSettings::new(recipient);
        if let Some(subject) = lookup("MAIL_SUBJECT") {
            mail.subject = subject;
        }
        if let Some(body) = lookup("MAIL_BODY") {
            mail.body_template = body;
        }
        if let Some(anonymous) = lookup("MAIL_ANONYMOUS_NAME") {
            mail.anonymous_name = anonymous;
        }
        mail.attachment_prefix = try_load(&lookup, "ATTACHMENT_PREFIX", "survey")?;

        Ok(Self {
            port: try_load(&lookup, "SURVEY_PORT", "8501")?,
            catalog_path: try_load(&lookup, "SURVEY_CATALOG", "survey.toml")?,
            assets_dir: try_load(&lookup, "SURVEY_ASSETS", "assets")?,
            smtp: SmtpSettings {
                host: try_load(&lookup, "SMTP_HOST", "smtp.gmail.com")?,
                port: try_load(&lookup, "SMTP_PORT", "465")?,
                username,
                password,
                from: sender,
                timeout: Duration::from_secs(timeout_secs),
            },
            mail,
        })
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse(key, value)
}

fn require<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()))?;
    parse(key, value)
}

fn parse<T: FromStr>(key: &str, value: String) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
            // Never echo secrets back.
            value: if key == "MAIL_PASSWORD" { "***".to_string() } else { value },
        }
    })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_everything_but_credentials() {
        let config = Config::from_lookup(lookup(&[
            ("MAIL_ADDRESS", "survey@example.com"),
            ("MAIL_PASSWORD", "hunter2"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8501);
        assert_eq!(config.catalog_path, PathBuf::from("survey.toml"));
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.username, "survey@example.com");
        assert_eq!(config.smtp.timeout, Duration::from_secs(20));
        assert_eq!(config.mail.recipient.email.to_string(), "survey@example.com");
        assert_eq!(config.mail.attachment_prefix, "survey");
        assert_eq!(config.mail.anonymous_name, "anonym");
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            ("MAIL_ADDRESS", "survey@example.com"),
            ("MAIL_PASSWORD", "hunter2"),
            ("MAIL_RECIPIENT", "chef@example.com"),
            ("SMTP_PORT", "2465"),
            ("MAIL_SUBJECT", "Neue Antwort"),
            ("ATTACHMENT_PREFIX", "pralinen"),
            ("MAIL_ANONYMOUS_NAME", "Gast"),
        ]))
        .unwrap();

        assert_eq!(config.smtp.port, 2465);
        assert_eq!(config.mail.recipient.email.to_string(), "chef@example.com");
        assert_eq!(config.mail.subject, "Neue Antwort");
        assert_eq!(config.mail.attachment_prefix, "pralinen");
        assert_eq!(config.mail.anonymous_name, "Gast");
    }

    #[test]
    fn missing_password_is_reported() {
        let err = Config::from_lookup(lookup(&[("MAIL_ADDRESS", "survey@example.com")])).unwrap_err();

        assert!(matches!(err, ConfigError::Missing(ref key) if key == "MAIL_PASSWORD"));
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = Config::from_lookup(lookup(&[
            ("MAIL_ADDRESS", "survey@example.com"),
            ("MAIL_PASSWORD", "hunter2"),
            ("SURVEY_PORT", "eighty"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "SURVEY_PORT"));
    }

    #[test]
    fn password_is_not_logged() {
        let config = Config::from_lookup(lookup(&[
            ("MAIL_ADDRESS", "survey@example.com"),
            ("MAIL_PASSWORD", "hunter2"),
        ]))
        .unwrap();

        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
