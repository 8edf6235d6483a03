//! Core numeric components: best-fit selection and tolerance mapping.
//!
//! Both are pure functions over fully materialized in-memory tables; all
//! I/O lives elsewhere. Each call is independently reentrant, so separate
//! datasets may be processed concurrently without coordination.

pub mod mapping;
pub mod selection;

pub use mapping::map_test_points;
pub use selection::select_ideal_functions;

/// Hash/equality key for an exact-match join on a float position column.
///
/// Positions are assumed to be pre-quantized grid values shared verbatim
/// between tables, so exact bit comparison is the contract — with one
/// exception: IEEE `-0.0` compares equal to `0.0` but has different bits,
/// so it is normalized first. NaN positions never reach the core (ingest
/// rejects non-finite cells).
pub(crate) fn x_key(x: f64) -> u64 {
    let x = if x == 0.0 { 0.0 } else { x };
    x.to_bits()
}

#[cfg(test)]
mod tests {
    use super::x_key;

    #[test]
    fn x_key_joins_negative_zero_with_zero() {
        assert_eq!(x_key(-0.0), x_key(0.0));
    }

    #[test]
    fn x_key_distinguishes_close_values() {
        assert_ne!(x_key(1.0), x_key(1.0 + f64::EPSILON));
    }
}
