//! Collision-resolution policies.
//!
//! A probe maps a base hash and an attempt count to a candidate slot index.
//! All three policies are pure functions of their inputs; the table owns the
//! only mutable state.
//!
//! Quadratic probing does not visit every slot of a prime-sized table: only
//! about half of the residues are reachable. Every loop over a probe sequence
//! is therefore bounded at exactly `capacity` attempts, and running out of
//! attempts means "not present" or "no room on this sequence".

use crate::error::Error;
use crate::error::Result;

/// The collision-resolution policy of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProbeStrategy {
    /// `(h + a) mod capacity`
    #[default]
    Linear,
    /// `(h + a²) mod capacity`
    Quadratic,
    /// `(h mod capacity + a·h2) mod capacity` with
    /// `h2 = previous_prime - (h mod previous_prime)`
    DoubleHashing,
}

impl ProbeStrategy {
    /// Computes the candidate index for `attempt` on a table of `capacity`
    /// slots.
    ///
    /// `previous_prime` is only read by [`ProbeStrategy::DoubleHashing`].
    ///
    /// # Errors
    ///
    /// [`Error::AttemptOutOfRange`] if `attempt > capacity`, and
    /// [`Error::InvalidProbeModulus`] if `capacity` (or, for double hashing,
    /// `previous_prime`) is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::ProbeStrategy;
    ///
    /// assert_eq!(ProbeStrategy::Linear.index(10, 2, 11, 7), Ok(1));
    /// assert_eq!(ProbeStrategy::Quadratic.index(10, 2, 11, 7), Ok(3));
    /// assert_eq!(ProbeStrategy::DoubleHashing.index(10, 2, 11, 7), Ok(7));
    /// assert!(ProbeStrategy::Linear.index(10, 12, 11, 7).is_err());
    /// ```
    pub fn index(
        self,
        hash: u64,
        attempt: usize,
        capacity: usize,
        previous_prime: usize,
    ) -> Result<usize> {
        match self {
            ProbeStrategy::Linear => linear(hash, attempt, capacity),
            ProbeStrategy::Quadratic => quadratic(hash, attempt, capacity),
            ProbeStrategy::DoubleHashing => double_hashing(hash, attempt, capacity, previous_prime),
        }
    }
}

#[inline(always)]
fn reduce(hash: u64, modulus: usize) -> usize {
    (hash % modulus as u64) as usize
}

#[inline]
fn check_attempt(attempt: usize, capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(Error::InvalidProbeModulus);
    }
    if attempt > capacity {
        return Err(Error::AttemptOutOfRange { attempt, capacity });
    }
    Ok(())
}

/// Linear probing: `(hash + attempt) mod capacity`.
pub fn linear(hash: u64, attempt: usize, capacity: usize) -> Result<usize> {
    check_attempt(attempt, capacity)?;
    let index = (reduce(hash, capacity) as u128 + attempt as u128) % capacity as u128;
    Ok(index as usize)
}

/// Quadratic probing: `(hash + attempt²) mod capacity`.
pub fn quadratic(hash: u64, attempt: usize, capacity: usize) -> Result<usize> {
    check_attempt(attempt, capacity)?;
    let square = attempt as u128 * attempt as u128;
    let index = (reduce(hash, capacity) as u128 + square) % capacity as u128;
    Ok(index as usize)
}

/// The double-hashing jump: `previous_prime - (hash mod previous_prime)`.
///
/// Always in `1..=previous_prime`, so the probe never stalls on one slot.
///
/// # Examples
///
/// ```rust
/// use probe_table::probe::step;
///
/// assert_eq!(step(0, 7), Ok(7));
/// assert_eq!(step(6, 7), Ok(1));
/// assert_eq!(step(25, 7), Ok(3));
/// ```
pub fn step(hash: u64, previous_prime: usize) -> Result<usize> {
    if previous_prime == 0 {
        return Err(Error::InvalidProbeModulus);
    }
    Ok(previous_prime - reduce(hash, previous_prime))
}

/// Double hashing: `(hash mod capacity + attempt · step(hash)) mod capacity`.
pub fn double_hashing(
    hash: u64,
    attempt: usize,
    capacity: usize,
    previous_prime: usize,
) -> Result<usize> {
    check_attempt(attempt, capacity)?;
    let jump = step(hash, previous_prime)?;
    let index =
        (reduce(hash, capacity) as u128 + attempt as u128 * jump as u128) % capacity as u128;
    Ok(index as usize)
}

/// The bounded probe sequence of one hash: attempts `0..capacity`.
///
/// Yields at most `capacity` indices and may repeat indices (quadratic
/// probing does). Iteration stops early only if the probe parameters are
/// invalid.
///
/// # Examples
///
/// ```rust
/// use probe_table::ProbeStrategy;
/// use probe_table::probe::ProbeSeq;
///
/// let seq = ProbeSeq::new(ProbeStrategy::Quadratic, 0, 5, 3);
/// assert_eq!(seq.collect::<Vec<_>>(), [0, 1, 4, 4, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    strategy: ProbeStrategy,
    hash: u64,
    capacity: usize,
    previous_prime: usize,
    attempt: usize,
}

impl ProbeSeq {
    /// Starts the probe sequence for `hash`.
    pub fn new(strategy: ProbeStrategy, hash: u64, capacity: usize, previous_prime: usize) -> Self {
        Self {
            strategy,
            hash,
            capacity,
            previous_prime,
            attempt: 0,
        }
    }

    /// Number of indices computed so far.
    pub fn attempts(&self) -> usize {
        self.attempt
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.capacity {
            return None;
        }

        let index = self
            .strategy
            .index(self.hash, self.attempt, self.capacity, self.previous_prime)
            .ok()?;
        self.attempt += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.capacity.saturating_sub(self.attempt)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn linear_wraps() {
        assert_eq!(linear(5, 0, 11), Ok(5));
        assert_eq!(linear(5, 3, 11), Ok(8));
        assert_eq!(linear(10, 1, 11), Ok(0));
        assert_eq!(linear(10, 3, 11), Ok(2));
        assert_eq!(linear(11, 11, 11), Ok(0));
    }

    #[test]
    fn quadratic_squares_attempt() {
        assert_eq!(quadratic(5, 0, 11), Ok(5));
        assert_eq!(quadratic(5, 1, 11), Ok(6));
        assert_eq!(quadratic(5, 2, 11), Ok(9));
        assert_eq!(quadratic(5, 3, 11), Ok(3));
        assert_eq!(quadratic(10, 3, 11), Ok(8));
        assert_eq!(quadratic(11, 11, 11), Ok(0));
    }

    #[test]
    fn step_is_never_zero() {
        assert_eq!(step(1, 7), Ok(6));
        assert_eq!(step(7, 7), Ok(7));
        for hash in 0..100u64 {
            let jump = step(hash, 7).unwrap();
            assert!((1..=7).contains(&jump));
        }
        assert_eq!(step(3, 0), Err(Error::InvalidProbeModulus));
    }

    #[test]
    fn double_hashing_jumps() {
        assert_eq!(double_hashing(5, 0, 11, 7), Ok(5));
        assert_eq!(double_hashing(5, 1, 11, 7), Ok(7));
        assert_eq!(double_hashing(5, 2, 11, 7), Ok(9));
        assert_eq!(double_hashing(5, 3, 11, 7), Ok(0));
        assert_eq!(double_hashing(10, 1, 11, 7), Ok(3));
        assert_eq!(double_hashing(10, 3, 11, 7), Ok(0));
        assert_eq!(double_hashing(11, 11, 11, 7), Ok(0));
    }

    #[test]
    fn rejects_out_of_range_attempts() {
        for strategy in [
            ProbeStrategy::Linear,
            ProbeStrategy::Quadratic,
            ProbeStrategy::DoubleHashing,
        ] {
            assert_eq!(
                strategy.index(5, 12, 11, 7),
                Err(Error::AttemptOutOfRange {
                    attempt: 12,
                    capacity: 11
                })
            );
            assert!(strategy.index(5, 11, 11, 7).is_ok());
            assert_eq!(strategy.index(5, 0, 0, 7), Err(Error::InvalidProbeModulus));
        }
        assert_eq!(
            ProbeStrategy::DoubleHashing.index(5, 0, 11, 0),
            Err(Error::InvalidProbeModulus)
        );
    }

    #[test]
    fn huge_hashes_do_not_overflow() {
        let capacity = 1_000_003;
        for strategy in [
            ProbeStrategy::Linear,
            ProbeStrategy::Quadratic,
            ProbeStrategy::DoubleHashing,
        ] {
            let index = strategy
                .index(u64::MAX, capacity, capacity, 999_983)
                .unwrap();
            assert!(index < capacity);
        }
    }

    #[test]
    fn sequence_is_bounded_by_capacity() {
        for strategy in [
            ProbeStrategy::Linear,
            ProbeStrategy::Quadratic,
            ProbeStrategy::DoubleHashing,
        ] {
            let mut seq = ProbeSeq::new(strategy, 42, 13, 11);
            let indices: Vec<usize> = seq.by_ref().collect();
            assert_eq!(indices.len(), 13);
            assert_eq!(seq.attempts(), 13);
            assert!(indices.iter().all(|&i| i < 13));
        }
    }

    #[test]
    fn linear_and_double_hashing_cover_prime_tables() {
        for hash in 0..50u64 {
            for strategy in [ProbeStrategy::Linear, ProbeStrategy::DoubleHashing] {
                let mut seen: Vec<usize> = ProbeSeq::new(strategy, hash, 13, 11).collect();
                seen.sort_unstable();
                seen.dedup();
                assert_eq!(seen.len(), 13, "{strategy:?} missed slots for {hash}");
            }
        }
    }

    #[test]
    fn quadratic_leaves_gaps() {
        let mut seen: Vec<usize> = ProbeSeq::new(ProbeStrategy::Quadratic, 0, 5, 3).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, [0, 1, 4]);
    }

    #[test]
    fn invalid_parameters_end_the_sequence() {
        assert_eq!(ProbeSeq::new(ProbeStrategy::DoubleHashing, 1, 5, 0).count(), 0);
        assert_eq!(ProbeSeq::new(ProbeStrategy::Linear, 1, 0, 0).count(), 0);
    }
}
