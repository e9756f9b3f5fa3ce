//! One module per table.

pub mod alerts;
pub mod daily_distance;
pub mod samples;
