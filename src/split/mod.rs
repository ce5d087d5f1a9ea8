//! Split Calculation Engine
//!
//! Allocates an expense total across participants under four policies:
//! equal, custom amounts, percentage, and item-based. The entry point is
//! [`calculate_split`], which dispatches on the [`SplitInput`] tagged enum.
//!
//! # Critical Invariants
//!
//! 1. **Conservation**: a valid result's share amounts sum to the total,
//!    exactly to the cent, for every policy
//! 2. **Determinism**: rounding remainders go to the last participant in
//!    caller-supplied order, so recomputation reproduces the same splits
//! 3. **Errors are values**: invalid input comes back as
//!    `SplitResult { is_valid: false, error: Some(..) }` for inline form
//!    rendering, never as `Err` or a panic

mod engine;

// Re-export public API
pub use engine::{
    calculate_split, CustomAssignment, PercentageAssignment, SplitInput, SplitParticipant,
    SplitResult,
};
