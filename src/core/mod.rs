//! Core library components.
//!
//! Business logic for environment replication and load-balancer rule
//! updates, independent of terminal output.

pub mod config;
pub mod constants;
#[cfg(feature = "aws")]
pub mod elb;
pub mod git;
pub mod pipeline;
pub mod replicate;
pub mod rules;
