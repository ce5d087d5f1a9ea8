//! Fixed-point money arithmetic
//!
//! All money values in the ledger are i64 minor units (cents). Decimal
//! strings exist only at the parsing/formatting boundary; the engines never
//! touch floating point on a conservation-critical path.
//!
//! # Critical Invariants
//!
//! 1. `distribute_evenly(total, n)` returns shares that sum to `total`
//!    exactly, for any sign of `total`
//! 2. The rounding remainder always goes to the **last** share, so results
//!    are reproducible across recomputation

/// Format a cent amount as a plain two-decimal string ("12.34", "-0.05").
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a user-typed amount ("12.34", "$12.3", "12") into cents.
///
/// Currency symbols and separators other than the decimal point are
/// stripped. A third fraction digit rounds half-up into the cent. Returns
/// `None` for empty or malformed input.
pub fn parse_amount(input: &str) -> Option<i64> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() || cleaned == "." {
        return None;
    }

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };
    if frac.contains('.') {
        return None;
    }

    let dollars: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut digits = frac.chars();
    let tens = digits.next().map_or(0, |c| c.to_digit(10).unwrap_or(0)) as i64;
    let ones = digits.next().map_or(0, |c| c.to_digit(10).unwrap_or(0)) as i64;
    let round_up = digits.next().map_or(0, |c| c.to_digit(10).unwrap_or(0)) >= 5;

    Some(dollars * 100 + tens * 10 + ones + i64::from(round_up))
}

/// Distribute `total` cents across `count` shares.
///
/// The first `count - 1` shares get the floored even share; the last share
/// gets whatever remains, so the shares always sum to `total` exactly.
/// Works for negative totals too (used for tax/fee gaps that can run either
/// way).
pub fn distribute_evenly(total: i64, count: usize) -> Vec<i64> {
    if count == 0 {
        return Vec::new();
    }
    let n = count as i64;
    let base = total.div_euclid(n);
    let remainder = total - base * n;

    let mut shares = vec![base; count];
    if let Some(last) = shares.last_mut() {
        *last += remainder;
    }
    shares
}

/// Floored percentage share of a cent total: `floor(pct / 100 × total)`.
///
/// The percentage is snapped to basis points (two decimals) first and the
/// share computed in integer arithmetic, so a value like 33.33% of $100.00
/// can never land at 3332.999… and floor the wrong way. Callers hand the
/// leftover cents to the last participant; see the percentage policy in
/// the split engine.
pub fn percentage_of(pct: f64, total: i64) -> i64 {
    let basis_points = (pct * 100.0).round() as i64;
    total * basis_points / 10_000
}
