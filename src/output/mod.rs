//! Output module for run results
//!
//! This module handles:
//! - Item records and their category-ordered aggregation
//! - Writing the results document as JSON
//! - Recording run statistics

mod json;
mod results;
pub mod stats;

pub use json::{render_json, write_json};
pub use results::{trailing_segment, CategoryResults, Item};
pub use stats::{print_statistics, RunStatistics};
