pub use resultmail_models::delivery::{DeliveryOutcome, DeliveryRequest};
pub use resultmail_models::marks::MarksRecord;
pub use resultmail_models::students::StudentRecord;
