//! Object detection: backend trait, record accumulation, and the
//! detection-record batch job.

pub mod annotate;
pub mod backend;
pub mod backends;
pub mod job;
pub mod records;
pub mod result;

pub use backend::DetectorBackend;
pub use records::DetectionRecords;
pub use result::{BoxRecord, Detection};
