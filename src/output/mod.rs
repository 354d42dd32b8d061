//! Output formatting.
//!
//! - [`terminal`] - Plan and result summaries for the terminal

mod terminal;

pub use terminal::{format_field, plan_rows, print_plan, print_result};
