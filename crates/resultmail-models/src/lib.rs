//! # Result Mailer Models
//!
//! Data structures exchanged with callers of the result mailer.
//!
//! # Modules
//!
//! - [`students`]: identity of the student a result belongs to
//! - [`marks`]: internal and external marks, in caller order
//! - [`delivery`]: the request envelope and the outcome returned to the caller
//!
//! # Example
//!
//! ```ignore
//! use resultmail_models::{DeliveryRequest, DeliveryOutcome};
//!
//! let request: DeliveryRequest = serde_json::from_value(body)?;
//! let outcome = DeliveryOutcome::sent();
//! ```

pub mod delivery;
pub mod marks;
pub mod students;

pub use delivery::{DeliveryOutcome, DeliveryRequest};
pub use marks::MarksRecord;
pub use students::StudentRecord;
