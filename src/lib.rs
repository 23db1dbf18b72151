//! Linker Map Resolution Library.
//!
//! This library provides the core components for the `mapres` analyzer.
//! It is organized into several modules:
//! - `config`: CLI configuration.
//! - `project`: Project and entry file loading.
//! - `address_space`: Memory regions and address classification.
//! - `translate`: Virtual to physical address translation.
//! - `entry`: Memory entry records and their ordering.
//! - `resolve`: Duplicate, containment and overlap resolution.
//! - `projection`: The objects-in-sections view.
//! - `analyzer`: The orchestration of a run.
//! - `summary`: Consumption totals per region.
//! - `writer`: JSON report output.

pub mod address_space;
pub mod analyzer;
pub mod config;
pub mod entry;
pub mod project;
pub mod projection;
pub mod resolve;
pub mod summary;
pub mod translate;
pub mod utils;
pub mod writer;
