use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// How the SMTP connection is secured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmtpTls {
    /// TLS from the first byte (SMTPS, usually port 465).
    Implicit,
    /// Plaintext upgraded with STARTTLS (usually port 587).
    StartTls,
    /// No encryption. Only for local relays such as MailHog.
    None,
}

impl SmtpTls {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "tls" | "implicit" | "ssl" => Some(Self::Implicit),
            "starttls" => Some(Self::StartTls),
            "none" | "plain" => Some(Self::None),
            _ => None,
        }
    }
}

/// SMTP account and transport settings.
///
/// Read once at startup; `EMAIL_USER` and `EMAIL_PASS` are required.
#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub tls: SmtpTls,
    pub username: String,
    pub password: String,
    pub from_name: String,
    pub send_timeout: Duration,
}

impl MailConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let username = required("EMAIL_USER")?;
        let password = required("EMAIL_PASS")?;

        let tls = match lookup("SMTP_TLS") {
            Some(raw) => SmtpTls::parse(&raw).ok_or(ConfigError::Invalid {
                key: "SMTP_TLS",
                value: raw,
            })?,
            None => SmtpTls::Implicit,
        };

        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "SMTP_PORT",
                value: raw.clone(),
            })?,
            None => match tls {
                SmtpTls::Implicit => 465,
                SmtpTls::StartTls => 587,
                SmtpTls::None => 25,
            },
        };

        let send_timeout = match lookup("MAIL_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "MAIL_TIMEOUT_SECS",
                        value: raw.clone(),
                    });
                }
            },
            None => Duration::from_secs(30),
        };

        Ok(Self {
            smtp_host: lookup("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            smtp_port,
            tls,
            username,
            password,
            from_name: lookup("FROM_NAME").unwrap_or_else(|| "Result Mailer".to_string()),
            send_timeout,
        })
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("tls", &self.tls)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_name", &self.from_name)
            .field("send_timeout", &self.send_timeout)
            .finish()
    }
}
