//! Core helpers shared by every engine

pub mod money;

pub use money::{distribute_evenly, format_cents, parse_amount, percentage_of};
