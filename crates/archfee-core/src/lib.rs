//! archfee-core - Core library for archfee
//!
//! Budget allocation, discipline split, top-down and bottom-up fee engines,
//! hours distribution, rate scenarios and variance checks for
//! architectural/engineering projects.
//!
//! Data lookups go through [`source::CostDataSource`] once per request;
//! everything after that is a pure function of the input and resolved data.

pub mod budget;
pub mod config;
pub mod cost_data;
pub mod disciplines;
pub mod error;
pub mod export;
pub mod fees;
pub mod hours;
pub mod pipeline;
pub mod resolve;
pub mod scenarios;
pub mod source;
pub mod variance;

pub use config::FeeConfig;
pub use cost_data::{canonical_building_type, CostDataResolver, ResolvedData};
pub use error::{validate_input, CalcNotes, CoreError};
pub use export::{export_fee_lines_to_csv, export_hours_to_csv, export_result_to_json};
pub use pipeline::{resolve_data, BudgetStage, Calculator};
pub use source::{CachedSource, CostDataSource, CostDataset, EmbeddedSource, JsonFileSource};
