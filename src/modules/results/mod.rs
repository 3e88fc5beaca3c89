//! Result delivery: render a student's marks to PDF, email it, remove it.

pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod model;
pub mod renderer;
pub mod router;
pub mod service;

pub use error::DeliveryError;
pub use model::*;
pub use router::init_results_router;
pub use service::{ArtifactLease, ResultService};
