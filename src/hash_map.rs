use core::fmt;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::config::TableConfig;
use crate::error::Result;
use crate::hash_table;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;
use crate::hasher::DefaultHashBuilder;
use crate::probe::ProbeStrategy;

/// A hash map backed by the open-addressing [`HashTable`].
///
/// Entries are stored as `(K, V)` pairs and compared by key alone: putting a
/// key that is already present replaces its value in place. Removal leaves a
/// tombstone holding the whole pair, exactly as [`HashSet`](crate::HashSet)
/// does.
///
/// # Examples
///
/// ```rust
/// use probe_table::HashMap;
/// use probe_table::IdentityBuildHasher;
/// use probe_table::ProbeStrategy;
/// use probe_table::TableConfig;
///
/// let config = TableConfig::new(5, ProbeStrategy::Quadratic);
/// let mut map = HashMap::with_config_and_hasher(config, IdentityBuildHasher::default()).unwrap();
///
/// assert_eq!(map.put(1u32, "one"), Ok(true));
/// assert_eq!(map.put(6, "six"), Ok(true));
/// assert_eq!(map.put(1, "uno"), Ok(false));
///
/// assert_eq!(map.get(&1), Some(&"uno"));
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.to_string(), "0:{E|-}   1:{V|1=uno}   2:{V|6=six}   3:{E|-}   4:{E|-}");
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.table.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> fmt::Display for HashMap<K, V, S>
where
    K: fmt::Display,
    V: fmt::Display,
{
    /// Renders every slot as `index:{S|key=value}`, separated by three spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.table.slots().iter().enumerate() {
            if index > 0 {
                f.write_str("   ")?;
            }
            let initial = slot.status().initial();
            match slot.value() {
                Some((k, v)) => write!(f, "{index}:{{{initial}|{k}={v}}}")?,
                None => write!(f, "{index}:{{{initial}|-}}")?,
            }
        }
        Ok(())
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty map with the default [`TableConfig`] and the given
    /// hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use probe_table::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::default(),
            hash_builder,
        }
    }

    /// Creates an empty map from a [`TableConfig`] and a hasher builder.
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

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots in the map. Always prime.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns the map's configuration, with its current capacity.
    pub fn config(&self) -> TableConfig {
        self.table.config()
    }

    /// Returns the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the underlying table of `(key, value)` pairs.
    pub fn table(&self) -> &HashTable<(K, V)> {
        &self.table
    }

    /// Removes every entry, keeping the capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Inserts a key-value pair, or replaces the value of a present key.
    ///
    /// Returns `Ok(true)` if a new entry was added and `Ok(false)` if an
    /// existing value was replaced. Also returns `Ok(false)`, dropping the
    /// pair, if the key's probe sequence reaches no free slot although the
    /// map is not full. Only new entries can grow the map.
    ///
    /// # Errors
    ///
    /// [`Error::Full`](crate::Error::Full) if the key is new and every slot
    /// holds a live entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_table::HashMap;
    ///
    /// let mut map: HashMap<&str, i32> = HashMap::default();
    /// assert_eq!(map.put("a", 1), Ok(true));
    /// assert_eq!(map.put("a", 2), Ok(false));
    /// assert_eq!(map.get(&"a"), Some(&2));
    /// # }
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Result<bool> {
        let hash = self.hash_builder.hash_one(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                entry.get_mut().1 = value;
                Ok(false)
            }
            TableEntry::Vacant(entry) => entry.insert((key, value)),
        }
    }

    /// Returns a reference to the value of `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_builder.hash_one(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value of `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_table::HashMap;
    ///
    /// let mut map: HashMap<u8, Vec<u8>> = HashMap::default();
    /// map.put(1, vec![]).unwrap();
    /// if let Some(list) = map.get_mut(&1) {
    ///     list.push(10);
    /// }
    /// assert_eq!(map.get(&1), Some(&vec![10]));
    /// # }
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_builder.hash_one(key);
        self.table
            .find_mut(hash, |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if the map holds an entry for `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the entry for `key`.
    ///
    /// Returns `Ok(true)` if an entry was removed. A successful removal may
    /// shrink the map.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`](crate::Error::Empty) if the map holds no entries.
    pub fn remove_key(&mut self, key: &K) -> Result<bool> {
        let hash = self.hash_builder.hash_one(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Returns an iterator over the entries in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys in slot order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over the values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Returns detailed utilization statistics of the underlying table.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty map of at least `capacity` slots with resizing
    /// disabled.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCapacity`](crate::Error::InvalidCapacity) if
    /// `capacity < 3`.
    pub fn new(capacity: usize, strategy: ProbeStrategy) -> Result<Self> {
        Self::with_config(TableConfig::new(capacity, strategy))
    }

    /// Creates an empty map from a [`TableConfig`].
    ///
    /// # Errors
    ///
    /// Any error reported by [`TableConfig::validate`].
    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, S::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// An iterator over the entries of a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
