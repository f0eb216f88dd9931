//! Report renderers and writers
//!
//! Every reporter consumes the serialized [`crate::models::ScanResult`]
//! contract; none of them contain scoring logic.

pub mod issues;
pub mod json;
pub mod markdown;
