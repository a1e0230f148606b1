// src/output/mod.rs
//! Output planning and delivery.
//!
//! The binary builds an `OutputPlan` from the converted document and hands
//! it to `deliver`; path helpers compute where assets live and how the
//! document links to them.

mod paths;
mod types;
mod writer;

pub use paths::{default_asset_dir, get_relative_path, sanitize_filename};
pub use types::{
    CompletedOperation, DeliveryTarget, ExecutionStats, FailedOperation, OutputPlan, OutputReport,
};
pub use writer::deliver;
