use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::config::TableConfig;
use crate::error::Result;
use crate::hash_table;
use crate::hash_table::HashTable;
use crate::hasher::DefaultHashBuilder;
use crate::probe::ProbeStrategy;
use crate::slot::Slot;

/// A hash set backed by the open-addressing [`HashTable`].
///
/// `HashSet<T, S>` stores values of type `T` where `T` implements `Hash + Eq`
/// and uses a hasher builder `S` to turn values into the table's 64-bit
/// hashes. Fallible operations surface the table's errors: inserting into a
/// full set that cannot grow fails with [`Error::Full`] and removing from an
/// empty set fails with [`Error::Empty`].
///
/// [`Error::Full`]: crate::Error::Full
/// [`Error::Empty`]: crate::Error::Empty
///
/// # Examples
///
/// ```rust
/// use probe_table::HashSet;
/// use probe_table::IdentityBuildHasher;
/// use probe_table::ProbeStrategy;
/// use probe_table::TableConfig;
///
/// let config = TableConfig::new(5, ProbeStrategy::Linear).with_max_load_factor(0.5);
/// let mut set = HashSet::with_config_and_hasher(config, IdentityBuildHasher::default()).unwrap();
///
/// assert_eq!(set.insert(5u64), Ok(true));
/// assert_eq!(set.insert(10), Ok(true));
/// assert_eq!(set.insert(10), Ok(false));
/// assert_eq!(set.capacity(), 5);
///
/// // 3 / 5 exceeds the maximum load factor.
/// set.insert(15).unwrap();
/// assert_eq!(set.capacity(), 11);
/// assert!(set.search(&15));
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.search(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.iter()).finish()
    }
}

impl<T, S> fmt::Display for HashSet<T, S>
where
    T: fmt::Display,
{
    /// Renders the slot array, see [`HashTable`]'s `Display`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.table, f)
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty set with the default [`TableConfig`] and the given
    /// hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashSet;
    /// use probe_table::IdentityBuildHasher;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_hasher(IdentityBuildHasher::default());
    /// assert!(set.is_empty());
    /// assert_eq!(set.capacity(), 11);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::default(),
            hash_builder,
        }
    }

    /// Creates an empty set from a [`TableConfig`] and a hasher builder.
    ///
    /// # Errors
    ///
    /// Any error reported by [`TableConfig::validate`].
    pub fn with_config_and_hasher(config: TableConfig, hash_builder: S) -> Result<Self> {
        Ok(Self {
            table: HashTable::with_config(config)?,
            hash_builder,
        })
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the set. Always prime.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the set's configuration, with its current capacity.
    pub fn config(&self) -> TableConfig {
        self.table.config()
    }

    /// Returns the set's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the underlying table.
    pub fn table(&self) -> &HashTable<T> {
        &self.table
    }

    /// Returns the slot at `index`, or `None` past the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashSet;
    /// use probe_table::IdentityBuildHasher;
    /// use probe_table::ProbeStrategy;
    /// use probe_table::Status;
    /// use probe_table::TableConfig;
    ///
    /// let config = TableConfig::new(5, ProbeStrategy::Quadratic);
    /// let mut set = HashSet::with_config_and_hasher(config, IdentityBuildHasher::default()).unwrap();
    /// set.insert(3u32).unwrap();
    /// set.remove(&3).unwrap();
    ///
    /// assert_eq!(set.slot(3).map(|s| s.status()), Some(Status::Tombstone));
    /// assert!(set.slot(5).is_none());
    /// ```
    pub fn slot(&self, index: usize) -> Option<&Slot<T>> {
        self.table.slot(index)
    }

    /// Removes every element, keeping the capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Adds a value to the set.
    ///
    /// Returns `Ok(true)` if the value was added. Returns `Ok(false)` if an
    /// equal value is already present, or if the probe sequence of `value`
    /// reaches no free slot although the set is not full. In both cases
    /// `value` is dropped. A successful insert may grow the set.
    ///
    /// # Errors
    ///
    /// [`Error::Full`](crate::Error::Full) if every slot holds a live value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::Error;
    /// use probe_table::HashSet;
    /// use probe_table::IdentityBuildHasher;
    /// use probe_table::ProbeStrategy;
    /// use probe_table::TableConfig;
    ///
    /// let config = TableConfig::new(3, ProbeStrategy::Linear);
    /// let mut set = HashSet::with_config_and_hasher(config, IdentityBuildHasher::default()).unwrap();
    ///
    /// assert_eq!(set.insert(1u8), Ok(true));
    /// assert_eq!(set.insert(2), Ok(true));
    /// assert_eq!(set.insert(3), Ok(true));
    /// assert_eq!(set.insert(3), Ok(false));
    /// assert_eq!(set.insert(4), Err(Error::Full));
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool> {
        let hash = self.hash_builder.hash_one(&value);
        self.table.entry(hash, |v| v == &value).or_insert(value)
    }

    /// Returns `true` if the set holds a value equal to `value`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_table::HashSet;
    ///
    /// let mut set: HashSet<&str> = HashSet::default();
    /// set.insert("a").unwrap();
    /// assert!(set.search(&"a"));
    /// assert!(!set.search(&"b"));
    /// # }
    /// ```
    pub fn search(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Removes a value from the set.
    ///
    /// Returns `Ok(true)` if the value was present. A successful removal may
    /// shrink the set.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`](crate::Error::Empty) if the set holds no values.
    pub fn remove(&mut self, value: &T) -> Result<bool> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |v| v == value)
    }

    /// Returns an iterator over the values in slot order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns detailed utilization statistics of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty set of at least `capacity` slots with resizing
    /// disabled.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCapacity`](crate::Error::InvalidCapacity) if
    /// `capacity < 3`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_table::HashSet;
    /// use probe_table::ProbeStrategy;
    ///
    /// let set: HashSet<i32> = HashSet::new(100, ProbeStrategy::DoubleHashing).unwrap();
    /// assert_eq!(set.capacity(), 101);
    /// # }
    /// ```
    pub fn new(capacity: usize, strategy: ProbeStrategy) -> Result<Self> {
        Self::with_config(TableConfig::new(capacity, strategy))
    }

    /// Creates an empty set from a [`TableConfig`].
    ///
    /// # Errors
    ///
    /// Any error reported by [`TableConfig::validate`].
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, S::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// An iterator over the values of a [`HashSet`].
pub struct Iter<'a, T> {
    inner: hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
