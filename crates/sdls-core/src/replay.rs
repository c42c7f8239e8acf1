//! Anti-Replay Window: validate a candidate IV/ARC against a stored
//! reference within a window `W`, and the big-endian counter increment that
//! feeds it.

use crate::error::{AntiReplayError, IncrementOverflow};

/// Increment an arbitrary-length big-endian byte string by one, in place,
/// starting from the least-significant (rightmost) octet and carrying left.
///
/// # Errors
///
/// Returns [`IncrementOverflow`] if the counter was all-ones and wrapped to
/// all-zero. The bytes are still updated to the wrapped value; the caller
/// decides whether overflow is fatal (see DESIGN.md).
pub fn increment_be(counter: &mut [u8]) -> Result<(), IncrementOverflow> {
    for byte in counter.iter_mut().rev() {
        let (next, carried) = byte.overflowing_add(1);
        *byte = next;
        if !carried {
            return Ok(());
        }
    }
    Err(IncrementOverflow)
}

/// Check whether `candidate` falls within `[reference, reference + window)`
/// under big-endian arbitrary-precision addition with wrap-around at
/// `2^(8*L)`, where `L = reference.len() == candidate.len()`.
///
/// Returns the smallest `k` such that `reference + k == candidate`.
///
/// # Errors
///
/// Returns [`AntiReplayError`] if no such `k` in `[0, window)` exists.
///
/// # Panics
///
/// Panics if `candidate.len() != reference.len()` — the caller guarantees
/// equal-length byte strings taken from the same SA's IV/ARC field, so a
/// mismatch here indicates a bug upstream, not a malformed frame.
pub fn check_window(candidate: &[u8], reference: &[u8], window: u32) -> Result<u32, AntiReplayError> {
    assert_eq!(
        candidate.len(),
        reference.len(),
        "anti-replay candidate and reference must share the SA's counter length"
    );

    let mut probe = reference.to_vec();
    for k in 0..window {
        if probe == candidate {
            return Ok(k);
        }
        // Advancing past all-ones wraps; a wrapped probe can still match a
        // candidate that has itself wrapped, so keep going rather than
        // bailing out on overflow.
        let _ = increment_be(&mut probe);
    }
    Err(AntiReplayError)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn increment_carries_across_bytes() {
        let mut counter = [0x00, 0xFF];
        increment_be(&mut counter).expect("no overflow");
        assert_eq!(counter, [0x01, 0x00]);
    }

    #[test]
    fn increment_reports_overflow_from_all_ones() {
        let mut counter = [0xFF, 0xFF];
        let result = increment_be(&mut counter);
        assert_eq!(result, Err(IncrementOverflow));
        assert_eq!(counter, [0x00, 0x00]);
    }

    #[test]
    fn exact_reference_is_accepted_at_k_zero() {
        let reference = [0x00, 0x05];
        assert_eq!(check_window(&reference, &reference, 4), Ok(0));
    }

    #[test]
    fn value_inside_window_is_accepted() {
        let reference = [0x00, 0x05];
        let candidate = [0x00, 0x07];
        assert_eq!(check_window(&candidate, &reference, 4), Ok(2));
    }

    #[test]
    fn value_outside_window_is_rejected() {
        let reference = [0x00, 0x05];
        let candidate = [0x00, 0x0A];
        assert_eq!(check_window(&candidate, &reference, 4), Err(AntiReplayError));
    }

    #[test]
    fn value_before_reference_is_rejected() {
        let reference = [0x00, 0x05];
        let candidate = [0x00, 0x04];
        assert_eq!(check_window(&candidate, &reference, 8), Err(AntiReplayError));
    }

    proptest! {
        #[test]
        fn window_accepts_exactly_reference_plus_k(reference_val in 0u16..0xF000, window in 1u32..16, k in 0u32..16) {
            let reference = reference_val.to_be_bytes();
            let candidate = (reference_val.wrapping_add(k as u16)).to_be_bytes();

            let result = check_window(&candidate, &reference, window);
            if k < window {
                prop_assert_eq!(result, Ok(k));
            } else {
                prop_assert_eq!(result, Err(AntiReplayError));
            }
        }
    }
}
