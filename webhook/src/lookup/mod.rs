//! Best-effort vehicle enrichment.
//!
//! A failed lookup never fails a submission; callers receive a `Result` and
//! carry on without a record on `Err`.

pub mod vehicle_enquiry;

pub use vehicle_enquiry::{LookupError, VehicleEnquiryClient, VehicleRecord};
