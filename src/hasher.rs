use core::hash::BuildHasherDefault;
use core::hash::Hasher;

/// A deterministic hasher under which an integer hashes to its absolute value.
///
/// Successive writes fold as `h = 31·h + x`, so a single integer key keeps
/// its own value as its hash while strings and tuples still spread out. This
/// makes probe sequences predictable, which is what the table's slot-level
/// tests and the [`Display`](core::fmt::Display) output are written against.
/// It offers no protection against adversarial keys.
///
/// # Examples
///
/// ```rust
/// use core::hash::BuildHasher;
///
/// use probe_table::IdentityBuildHasher;
///
/// let hasher = IdentityBuildHasher::default();
/// assert_eq!(hasher.hash_one(16u32), 16);
/// assert_eq!(hasher.hash_one(-7i64), 7);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityHasher {
    hash: u64,
}

impl IdentityHasher {
    #[inline(always)]
    fn fold(&mut self, value: u64) {
        self.hash = self.hash.wrapping_mul(31).wrapping_add(value);
    }
}

impl Hasher for IdentityHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.fold(byte as u64);
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_i8(&mut self, i: i8) {
        self.fold(i.unsigned_abs() as u64);
    }

    #[inline]
    fn write_i16(&mut self, i: i16) {
        self.fold(i.unsigned_abs() as u64);
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.fold(i.unsigned_abs() as u64);
    }

    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.fold(i.unsigned_abs());
    }

    #[inline]
    fn write_isize(&mut self, i: isize) {
        self.fold(i.unsigned_abs() as u64);
    }
}

/// [`BuildHasher`](core::hash::BuildHasher) for [`IdentityHasher`].
pub type IdentityBuildHasher = BuildHasherDefault<IdentityHasher>;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = IdentityBuildHasher;
    }
}

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;

    use super::*;

    #[test]
    fn integers_hash_to_themselves() {
        let state = IdentityBuildHasher::default();
        for n in [0u64, 1, 6, 11, 16, 1 << 40] {
            assert_eq!(state.hash_one(n), n);
        }
        assert_eq!(state.hash_one(33i32), 33);
        assert_eq!(state.hash_one(5usize), 5);
        assert_eq!(state.hash_one(200u8), 200);
    }

    #[test]
    fn negative_integers_hash_to_absolute_value() {
        let state = IdentityBuildHasher::default();
        assert_eq!(state.hash_one(-5i32), 5);
        assert_eq!(state.hash_one(i64::MIN), 1 << 63);
        assert_eq!(state.hash_one(-1i8), 1);
    }

    #[test]
    fn strings_are_deterministic() {
        let state = IdentityBuildHasher::default();
        assert_eq!(state.hash_one("key"), state.hash_one("key"));
        assert_ne!(state.hash_one("key"), state.hash_one("yek"));
    }
}
