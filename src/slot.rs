//! Slot storage for the table core.
//!
//! A slot's status lives in its variant, so an element is present exactly
//! when the slot is occupied or a tombstone. Tombstones keep their element
//! for diagnostics only; lookups never report a tombstone as a match.

use core::fmt;

/// The status tag of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Never held an element since the last rebuild. Terminates probes.
    Empty,
    /// Holds a live element.
    Occupied,
    /// Held an element that has since been removed. Probes continue past it.
    Tombstone,
}

impl Status {
    /// Single-letter tag used by the table's `Display` output.
    pub fn initial(self) -> char {
        match self {
            Status::Empty => 'E',
            Status::Occupied => 'V',
            Status::Tombstone => 'D',
        }
    }
}

/// One cell of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<V> {
    /// No element.
    Empty,
    /// A live element and its cached hash.
    Occupied {
        /// Hash the element was placed with.
        hash: u64,
        /// The element.
        value: V,
    },
    /// A removed element, kept so probe chains through this slot stay intact.
    Tombstone {
        /// Hash the element was placed with.
        hash: u64,
        /// The removed element.
        value: V,
    },
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<V> Slot<V> {
    /// Returns the status tag of this slot.
    #[inline]
    pub fn status(&self) -> Status {
        match self {
            Slot::Empty => Status::Empty,
            Slot::Occupied { .. } => Status::Occupied,
            Slot::Tombstone { .. } => Status::Tombstone,
        }
    }

    /// Returns `true` if the slot holds a live element.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }

    /// Returns the element of an occupied slot or a tombstone.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        match self {
            Slot::Empty => None,
            Slot::Occupied { value, .. } | Slot::Tombstone { value, .. } => Some(value),
        }
    }

    /// Returns the live element, if any.
    #[inline]
    pub fn live(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn live_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Stores `value` in an empty slot or a tombstone.
    ///
    /// A reused tombstone drops its old element.
    #[inline]
    pub(crate) fn fill(&mut self, hash: u64, value: V) {
        debug_assert!(!self.is_occupied(), "filling an occupied slot");
        *self = Slot::Occupied { hash, value };
    }

    /// Turns an occupied slot into a tombstone, keeping the element in place.
    ///
    /// Returns `false` and leaves the slot untouched if it was not occupied.
    pub(crate) fn bury(&mut self) -> bool {
        match core::mem::take(self) {
            Slot::Occupied { hash, value } => {
                *self = Slot::Tombstone { hash, value };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Consumes the slot, yielding the hash and element if it was live.
    #[inline]
    pub(crate) fn into_live(self) -> Option<(u64, V)> {
        match self {
            Slot::Occupied { hash, value } => Some((hash, value)),
            _ => None,
        }
    }
}

impl<V: fmt::Display> fmt::Display for Slot<V> {
    /// Formats as `{S|element}`, with `-` standing in for a missing element.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let initial = self.status().initial();
        match self.value() {
            Some(value) => write!(f, "{{{initial}|{value}}}"),
            None => write!(f, "{{{initial}|-}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn lifecycle() {
        let mut slot: Slot<i32> = Slot::default();
        assert_eq!(slot.status(), Status::Empty);
        assert_eq!(slot.value(), None);
        assert!(!slot.bury());
        assert_eq!(slot, Slot::Empty);

        slot.fill(7, 42);
        assert_eq!(slot.status(), Status::Occupied);
        assert_eq!(slot.live(), Some(&42));

        assert!(slot.bury());
        assert_eq!(slot.status(), Status::Tombstone);
        assert_eq!(slot.value(), Some(&42));
        assert_eq!(slot.live(), None);
        assert!(!slot.bury());
        assert_eq!(slot.status(), Status::Tombstone);

        slot.fill(9, 99);
        assert_eq!(slot, Slot::Occupied { hash: 9, value: 99 });
        assert_eq!(slot.into_live(), Some((9, 99)));
    }

    #[test]
    fn tombstones_are_not_live() {
        let slot = Slot::Tombstone { hash: 1, value: 5 };
        assert_eq!(slot.clone().into_live(), None);
        assert_eq!(Slot::<i32>::Empty.into_live(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Slot::<i32>::Empty.to_string(), "{E|-}");
        assert_eq!(Slot::Occupied { hash: 0, value: 10 }.to_string(), "{V|10}");
        assert_eq!(Slot::Tombstone { hash: 0, value: 6 }.to_string(), "{D|6}");
    }

    #[test]
    fn status_initials() {
        let initials = [Status::Empty, Status::Occupied, Status::Tombstone].map(Status::initial);
        assert_eq!(initials, ['E', 'V', 'D']);
    }
}
