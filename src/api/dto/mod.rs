//! Data Transfer Objects for REST request/response serialization.
//!
//! Report bodies are the domain report types themselves; see
//! [`crate::domain::report`].

pub mod common_dto;
pub mod report_dto;
pub mod sensor_dto;

pub use common_dto::*;
pub use report_dto::*;
pub use sensor_dto::*;
