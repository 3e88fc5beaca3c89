//! # Result Mailer Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`email`]: SMTP account and transport settings (credentials are required)
//! - [`storage`]: where transient result documents are written
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: listen address
//!
//! Configuration is read once at process start and handed to the components
//! that need it; nothing reads the environment while serving a request.
//!
//! # Example
//!
//! ```ignore
//! use resultmail_config::{ArtifactConfig, CorsConfig, MailConfig, ServerConfig};
//!
//! let mail_config = MailConfig::from_env()?;
//! let artifact_config = ArtifactConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod cors;
pub mod email;
pub mod error;
pub mod server;
pub mod storage;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::{MailConfig, SmtpTls};
pub use error::ConfigError;
pub use server::ServerConfig;
pub use storage::ArtifactConfig;
