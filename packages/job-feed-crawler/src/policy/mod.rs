//! Crawl policy: robots.txt parsing and the fail-closed gate built on it.

pub mod gate;
pub mod robots;

pub use gate::{fetch_robots_txt, PolicyStatus, RobotsPolicyGate};
pub use robots::RobotsTxt;
