//! Data types for the job feed crawler.

pub mod raw;
pub mod record;
pub mod target;
