//! Analysis module unit tests

pub mod aggregation;
pub mod normaliser;
