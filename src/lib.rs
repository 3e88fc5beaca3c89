//! # Result Mailer API
//!
//! An HTTP service that turns a student's result into a PDF, emails it to the
//! student's parent (or the student), and removes the document afterwards.
//!
//! ## Overview
//!
//! A delivery request carries the student's identity and two groupings of
//! marks. The service:
//!
//! 1. Checks the request shape and rejects it with a 400 before doing any work
//! 2. Resolves the recipient (`parentEmail`, falling back to `email`)
//! 3. Renders a one-document PDF into a per-attempt artifact
//! 4. Sends it as an attachment named `result_<enrollmentNo>.pdf`
//! 5. Deletes the artifact, whether or not the send succeeded
//!
//! The caller only ever sees one of three messages; failure detail is logged.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── modules/
//! │   └── results/     # Delivery: renderer, dispatcher, orchestrating service
//! ├── utils/
//! │   └── email.rs     # Mailer seam and the SMTP transport
//! ├── validator.rs     # Request body extractor
//! ├── logging.rs       # Tracing setup and request logging
//! └── metrics.rs       # Prometheus recorder and delivery counters
//! ```
//!
//! The results module follows the usual layout:
//!
//! - `controller.rs`: HTTP handler
//! - `service.rs`: delivery orchestration and artifact lease
//! - `renderer.rs`: PDF layout and writing
//! - `dispatcher.rs`: message composition and sending
//! - `model.rs`: request and response types
//! - `router.rs`: Axum router configuration
//!
//! ## Configuration
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | `EMAIL_USER` | required | SMTP account, also the sender address |
//! | `EMAIL_PASS` | required | SMTP password |
//! | `SMTP_HOST` | `smtp.gmail.com` | SMTP relay |
//! | `SMTP_TLS` | `tls` | `tls`, `starttls` or `none` |
//! | `SMTP_PORT` | by TLS mode | 465, 587 or 25 |
//! | `MAIL_TIMEOUT_SECS` | `30` | Upper bound on one send |
//! | `ARTIFACT_DIR` | `storage/artifacts` | Where documents live during delivery |
//! | `OBSERVABILITY_ENABLED` | `true` | File logs, OTLP traces and `/metrics` |
//!
//! ## API Documentation
//!
//! - Swagger UI: `/swagger-ui`
//! - Scalar: `/scalar`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod modules;
pub mod router;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod utils;
pub mod validator;

pub use resultmail_config;
pub use resultmail_core;
pub use resultmail_models;
