//! Shared helpers for percentage arithmetic and calendar handling

pub mod math;
pub mod time;
