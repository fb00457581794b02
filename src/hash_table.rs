//! The open-addressing table core.
//!
//! [`HashTable`] owns a prime-sized array of [`Slot`]s and is addressed by a
//! precomputed hash plus an equality predicate, the same way
//! [`HashSet`](crate::HashSet) and [`HashMap`](crate::HashMap) drive it.
//! Every probe loop is bounded at `capacity` attempts. Removal leaves a
//! tombstone behind so that probe chains of later insertions stay intact, and
//! inserts reuse the first tombstone on their chain. After an insert the
//! table may grow; after a remove it may shrink. Both rebuild the array from
//! scratch, which also discards every tombstone.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::cfg::debug;
use crate::cfg::trace;
use crate::config::MIN_CAPACITY;
use crate::config::TableConfig;
use crate::error::Error;
use crate::error::Result;
use crate::prime::is_prime;
use crate::prime::next_prime;
use crate::prime::previous_prime;
use crate::probe::ProbeSeq;
use crate::probe::ProbeStrategy;
use crate::slot::Slot;
use crate::slot::Status;

const INDEX_SEPARATOR: &str = ":";
const SLOT_SPACING: &str = "   ";

/// Outcome of walking a probe sequence for a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    /// A live element matched.
    Live(usize),
    /// Only a tombstone matched. Tombstones are never authoritative.
    Buried(usize),
    Missing,
}

/// Outcome of walking a probe sequence for an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Landing {
    /// A live element already matches.
    Present(usize),
    /// The first tombstone on the chain, or the terminating empty slot.
    Vacant(usize),
    /// The bounded walk found neither an empty slot nor a tombstone.
    NoRoom,
}

/// Debug statistics for hash table analysis.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, PartialEq)]
pub struct DebugStats {
    /// Number of live elements
    pub populated: usize,
    /// Number of slots
    pub capacity: usize,
    /// Number of tombstone slots
    pub tombstones: usize,
    /// Number of empty slots
    pub empty: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Most probe attempts any live element needs to be found
    pub longest_probe: usize,
    /// Mean probe attempts over all live elements
    pub mean_probe: f64,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Slots: {} live, {} tombstones, {} empty",
            self.populated, self.tombstones, self.empty
        );
        println!(
            "Probes: {} longest, {:.2} mean",
            self.longest_probe, self.mean_probe
        );
    }
}

/// An open-addressing hash table with prime capacity and tombstone deletion.
///
/// `HashTable<V>` stores values of type `V`. Like the raw tables it is
/// modelled on, every operation takes the value's hash and an equality
/// predicate rather than hashing values itself.
///
/// ## Example
///
/// ```rust
/// use probe_table::HashTable;
/// use probe_table::ProbeStrategy;
/// use probe_table::hash_table::Entry;
///
/// let mut table: HashTable<u64> = HashTable::new(5, ProbeStrategy::Linear).unwrap();
///
/// // Values hash to themselves here, so 1, 6, 11 and 16 all collide.
/// for n in [1u64, 6, 11, 16] {
///     match table.entry(n, |&v| v == n) {
///         Entry::Vacant(entry) => assert_eq!(entry.insert(n), Ok(true)),
///         Entry::Occupied(_) => unreachable!(),
///     }
/// }
///
/// assert_eq!(table.to_string(), "0:{E|-}   1:{V|1}   2:{V|6}   3:{V|11}   4:{V|16}");
/// ```
#[derive(Clone, Debug)]
pub struct HashTable<V> {
    slots: Box<[Slot<V>]>,
    populated: usize,
    previous_prime: usize,

    strategy: ProbeStrategy,
    max_load_factor: f64,
    min_load_factor: f64,
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::from_valid(TableConfig::default())
    }
}

impl<V> HashTable<V> {
    /// Creates a table of at least `capacity` slots with resizing disabled.
    ///
    /// Non-prime capacities are rounded up to the next prime.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCapacity`] if `capacity < 3`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    /// use probe_table::ProbeStrategy;
    ///
    /// let table: HashTable<u64> = HashTable::new(8, ProbeStrategy::Quadratic).unwrap();
    /// assert_eq!(table.capacity(), 11);
    ///
    /// assert!(HashTable::<u64>::new(2, ProbeStrategy::Linear).is_err());
    /// ```
    pub fn new(capacity: usize, strategy: ProbeStrategy) -> Result<Self> {
        Self::with_config(TableConfig::new(capacity, strategy))
    }

    /// Creates a table from a full [`TableConfig`].
    ///
    /// # Errors
    ///
    /// Any error reported by [`TableConfig::validate`].
    pub fn with_config(config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: TableConfig) -> Self {
        let capacity = if is_prime(config.capacity) {
            config.capacity
        } else {
            next_prime(config.capacity)
        };

        Self {
            slots: empty_slots(capacity),
            populated: 0,
            previous_prime: step_prime(capacity),
            strategy: config.strategy,
            max_load_factor: config.max_load_factor,
            min_load_factor: config.min_load_factor,
        }
    }

    /// Returns the number of live elements.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots. Always a prime of at least 3.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.capacity() as f64
    }

    /// Returns the collision-resolution policy.
    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    /// Returns the largest prime below the capacity, the modulus of the
    /// double-hashing step.
    pub fn previous_prime(&self) -> usize {
        self.previous_prime
    }

    /// Returns the table's current configuration, with the current capacity.
    pub fn config(&self) -> TableConfig {
        TableConfig {
            capacity: self.capacity(),
            strategy: self.strategy,
            max_load_factor: self.max_load_factor,
            min_load_factor: self.min_load_factor,
        }
    }

    /// Returns the slot array, indexed by slot position.
    pub fn slots(&self) -> &[Slot<V>] {
        &self.slots
    }

    /// Returns the slot at `index`, or `None` past the end.
    pub fn slot(&self, index: usize) -> Option<&Slot<V>> {
        self.slots.get(index)
    }

    /// Returns an iterator over the live values in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    /// Removes every element, tombstones included, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Empty);
        self.populated = 0;
    }

    #[inline]
    fn probe(&self, hash: u64) -> ProbeSeq {
        ProbeSeq::new(self.strategy, hash, self.capacity(), self.previous_prime)
    }

    /// Walks the probe sequence until an empty slot or a live match.
    ///
    /// A tombstone holding a match is remembered, but the walk continues past
    /// it because a live copy further along takes precedence.
    fn lookup(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Lookup {
        let mut buried = None;
        for index in self.probe(hash) {
            match &self.slots[index] {
                Slot::Empty => break,
                Slot::Occupied { hash: h, value } => {
                    if *h == hash && eq(value) {
                        return Lookup::Live(index);
                    }
                }
                Slot::Tombstone { hash: h, value } => {
                    if buried.is_none() && *h == hash && eq(value) {
                        buried = Some(index);
                    }
                }
            }
        }

        buried.map_or(Lookup::Missing, Lookup::Buried)
    }

    /// Walks the probe sequence looking for a duplicate and, failing that,
    /// for the slot a new value should take: the first tombstone seen, else
    /// the terminating empty slot.
    ///
    /// If the walk runs out of attempts after passing a tombstone, that
    /// tombstone is still used.
    fn landing(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Landing {
        let mut tombstone = None;
        for index in self.probe(hash) {
            match &self.slots[index] {
                Slot::Empty => return Landing::Vacant(tombstone.unwrap_or(index)),
                Slot::Occupied { hash: h, value } => {
                    if *h == hash && eq(value) {
                        return Landing::Present(index);
                    }
                }
                Slot::Tombstone { .. } => {
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
            }
        }

        tombstone.map_or(Landing::NoRoom, Landing::Vacant)
    }

    /// Finds a live value by hash and equality predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    /// use probe_table::ProbeStrategy;
    ///
    /// let mut table = HashTable::new(7, ProbeStrategy::DoubleHashing).unwrap();
    /// table.entry(42, |&v: &u64| v == 42).or_insert(42).unwrap();
    ///
    /// assert_eq!(table.find(42, |&v| v == 42), Some(&42));
    /// assert_eq!(table.find(99, |&v| v == 99), None);
    /// ```
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        match self.lookup(hash, eq) {
            Lookup::Live(index) => self.slots[index].live(),
            Lookup::Buried(_) | Lookup::Missing => None,
        }
    }

    /// Finds a live value by hash and equality predicate, returning a mutable
    /// reference.
    ///
    /// The value must keep hashing to `hash` and comparing equal the way it
    /// did on insertion.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        match self.lookup(hash, eq) {
            Lookup::Live(index) => self.slots[index].live_mut(),
            Lookup::Buried(_) | Lookup::Missing => None,
        }
    }

    /// Removes a live value, leaving a tombstone in its slot.
    ///
    /// Returns `Ok(false)` if no live value matches. A successful removal may
    /// shrink the table.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if the table holds no live elements. This is checked
    /// before anything else.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::Error;
    /// use probe_table::HashTable;
    /// use probe_table::ProbeStrategy;
    ///
    /// let mut table = HashTable::new(5, ProbeStrategy::Linear).unwrap();
    /// assert_eq!(table.remove(3, |&v: &u64| v == 3), Err(Error::Empty));
    ///
    /// table.entry(3, |&v| v == 3).or_insert(3).unwrap();
    /// assert_eq!(table.remove(3, |&v| v == 3), Ok(true));
    /// assert_eq!(table.len(), 0);
    /// assert_eq!(table.to_string(), "0:{E|-}   1:{E|-}   2:{E|-}   3:{D|3}   4:{E|-}");
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<bool> {
        if self.populated == 0 {
            return Err(Error::Empty);
        }

        let Lookup::Live(index) = self.lookup(hash, eq) else {
            return Ok(false);
        };

        let buried = self.slots[index].bury();
        debug_assert!(buried);
        self.populated -= 1;

        self.maybe_shrink();
        Ok(true)
    }

    /// Gets the entry for the given hash and equality predicate.
    ///
    /// The walk that decides between [`Entry::Occupied`] and
    /// [`Entry::Vacant`] also picks the landing slot, so a vacant entry
    /// inserts without probing again.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    /// use probe_table::ProbeStrategy;
    /// use probe_table::hash_table::Entry;
    ///
    /// let mut table = HashTable::new(11, ProbeStrategy::Quadratic).unwrap();
    ///
    /// match table.entry(7, |&(k, _): &(u64, &str)| k == 7) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert((7, "seven")).unwrap();
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// match table.entry(7, |&(k, _)| k == 7) {
    ///     Entry::Occupied(mut entry) => entry.get_mut().1 = "SEVEN",
    ///     Entry::Vacant(_) => unreachable!(),
    /// }
    ///
    /// assert_eq!(table.find(7, |&(k, _)| k == 7), Some(&(7, "SEVEN")));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.landing(hash, eq) {
            Landing::Present(index) => match &mut self.slots[index] {
                Slot::Occupied { value, .. } => Entry::Occupied(OccupiedEntry { value }),
                _ => unreachable!("landing matched a slot that is not live"),
            },
            Landing::Vacant(index) => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index: Some(index),
            }),
            Landing::NoRoom => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index: None,
            }),
        }
    }

    fn occupy(&mut self, index: usize, hash: u64, value: V) {
        if self.slots[index].status() == Status::Tombstone {
            trace!("reusing tombstone at {index}");
        }
        self.slots[index].fill(hash, value);
        self.populated += 1;
    }

    #[inline]
    fn maybe_grow(&mut self) {
        if self.load_factor() > self.max_load_factor {
            self.grow();
        }
    }

    #[cold]
    fn grow(&mut self) {
        let capacity = next_prime(self.capacity() * 2);
        debug!(
            "growing from {} to {} slots at load factor {:.3}",
            self.capacity(),
            capacity,
            self.load_factor()
        );
        self.rebuild(capacity);
    }

    #[inline]
    fn maybe_shrink(&mut self) {
        if self.load_factor() < self.min_load_factor {
            self.shrink();
        }
    }

    #[cold]
    fn shrink(&mut self) {
        let target = (self.capacity() / 2).max(MIN_CAPACITY);
        let capacity = previous_prime(target).map_or(MIN_CAPACITY, |p| p.max(MIN_CAPACITY));
        if capacity < self.populated {
            debug!(
                "skipping shrink to {} slots with {} live elements",
                capacity, self.populated
            );
            return;
        }

        debug!(
            "shrinking from {} to {} slots at load factor {:.3}",
            self.capacity(),
            capacity,
            self.load_factor()
        );
        self.rebuild(capacity);
    }

    /// Moves every live value into a fresh all-empty array of `capacity`
    /// slots, in slot order. Tombstones are dropped.
    ///
    /// Each placement is followed by the grow check, as for any insert. When
    /// the load passes the maximum, or the probe strategy cannot place a
    /// value, the rebuild starts over at `next_prime(2 * capacity)` with the
    /// values placed so far, in their new slot order, ahead of the rest.
    fn rebuild(&mut self, mut capacity: usize) {
        let mut pending = self.take_live();

        loop {
            self.slots = empty_slots(capacity);
            self.previous_prime = step_prime(capacity);

            let mut values = pending.into_iter();
            let mut stranded = None;
            let mut overloaded = false;
            for (hash, value) in values.by_ref() {
                match self.landing(hash, |_| false) {
                    Landing::Vacant(index) => self.occupy(index, hash, value),
                    Landing::Present(_) | Landing::NoRoom => {
                        stranded = Some((hash, value));
                        break;
                    }
                }
                if self.load_factor() > self.max_load_factor {
                    overloaded = true;
                    break;
                }
            }

            if stranded.is_none() && !overloaded {
                return;
            }

            let next = next_prime(capacity * 2);
            if overloaded {
                debug!(
                    "load factor {:.3} passed the maximum during rebuild, growing from {} to {} slots",
                    self.load_factor(),
                    capacity,
                    next
                );
            } else {
                debug!(
                    "no slot reachable at {} slots, rebuilding at {} instead",
                    capacity, next
                );
            }
            pending = self.take_live();
            pending.extend(stranded);
            pending.extend(values);
            capacity = next;
        }
    }

    fn take_live(&mut self) -> Vec<(u64, V)> {
        let slots = core::mem::take(&mut self.slots);
        self.populated = 0;
        slots
            .into_vec()
            .into_iter()
            .filter_map(Slot::into_live)
            .collect()
    }

    /// Returns detailed utilization statistics.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let mut tombstones = 0;
        let mut empty = 0;
        let mut longest_probe = 0;
        let mut total_probe = 0;

        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => empty += 1,
                Slot::Tombstone { .. } => tombstones += 1,
                Slot::Occupied { hash, .. } => {
                    let mut seq = self.probe(*hash);
                    let probes = match seq.position(|i| i == index) {
                        Some(position) => position + 1,
                        None => self.capacity(),
                    };
                    longest_probe = longest_probe.max(probes);
                    total_probe += probes;
                }
            }
        }

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            tombstones,
            empty,
            load_factor: self.load_factor(),
            longest_probe,
            mean_probe: if self.populated == 0 {
                0.0
            } else {
                total_probe as f64 / self.populated as f64
            },
        }
    }
}

fn empty_slots<V>(capacity: usize) -> Box<[Slot<V>]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

fn step_prime(capacity: usize) -> usize {
    previous_prime(capacity).unwrap_or(MIN_CAPACITY - 1)
}

impl<V: fmt::Display> fmt::Display for HashTable<V> {
    /// Renders every slot as `index:{S|element}`, separated by three spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            if index > 0 {
                f.write_str(SLOT_SPACING)?;
            }
            write!(f, "{index}{INDEX_SEPARATOR}{slot}")?;
        }
        Ok(())
    }
}

/// A view into a single entry in the table, which may be vacant or occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no live value matches
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a live value matches
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant.
    ///
    /// Returns whether a value was inserted; see [`VacantEntry::insert`].
    pub fn or_insert(self, default: V) -> Result<bool> {
        match self {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Modifies the value in place if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

/// A view into a vacant entry of a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: Option<usize>,
}

impl<V> VacantEntry<'_, V> {
    /// Returns `true` if the probe walk found a slot for this entry.
    ///
    /// Quadratic probing can miss every free slot of a table that still has
    /// room; such an entry cannot be inserted.
    pub fn has_room(&self) -> bool {
        self.index.is_some()
    }

    /// Inserts `value` into the slot chosen by the probe walk.
    ///
    /// Returns `Ok(true)` once the value is stored, after which the table may
    /// grow. Returns `Ok(false)`, dropping `value`, if the walk found no slot
    /// even though the table is not full.
    ///
    /// # Errors
    ///
    /// [`Error::Full`] if no slot was found and every slot is live.
    pub fn insert(self, value: V) -> Result<bool> {
        let Some(index) = self.index else {
            if self.table.populated == self.table.capacity() {
                return Err(Error::Full);
            }
            debug!("no free slot on the probe sequence of {:#x}", self.hash);
            return Ok(false);
        };

        self.table.occupy(index, self.hash, value);
        self.table.maybe_grow();
        Ok(true)
    }
}

/// A view into an occupied entry of a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    value: &'a mut V,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        self.value
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        self.value
    }

    /// Converts the entry into a mutable reference bound to the table.
    pub fn into_mut(self) -> &'a mut V {
        self.value
    }
}

/// An iterator over the live values of a [`HashTable`], in slot order.
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().find_map(Slot::live)
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
