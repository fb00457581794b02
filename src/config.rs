use crate::error::Error;
use crate::error::Result;
use crate::probe::ProbeStrategy;

/// Smallest capacity a table may have.
pub const MIN_CAPACITY: usize = 3;

/// Maximum load factor that never triggers growth: the load factor of a
/// table cannot exceed 1.0.
pub const NO_GROW: f64 = 2.0;

/// Minimum load factor that never triggers shrinking: the load factor of a
/// table is never negative.
pub const NO_SHRINK: f64 = -1.0;

/// Construction parameters of a table.
///
/// The capacity is rounded up to the next prime when the table is built.
///
/// # Examples
///
/// ```rust
/// use probe_table::HashTable;
/// use probe_table::ProbeStrategy;
/// use probe_table::TableConfig;
///
/// let config = TableConfig::default()
///     .with_capacity(8)
///     .with_strategy(ProbeStrategy::DoubleHashing)
///     .with_max_load_factor(0.5)
///     .with_min_load_factor(0.15);
///
/// let table: HashTable<u64> = HashTable::with_config(config).unwrap();
/// assert_eq!(table.capacity(), 11);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableConfig {
    /// Requested number of slots, at least [`MIN_CAPACITY`].
    pub capacity: usize,
    /// Collision-resolution policy.
    pub strategy: ProbeStrategy,
    /// Grow once `len / capacity` exceeds this after an insert.
    pub max_load_factor: f64,
    /// Shrink once `len / capacity` drops below this after a remove.
    pub min_load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: 11,
            strategy: ProbeStrategy::Linear,
            max_load_factor: NO_GROW,
            min_load_factor: NO_SHRINK,
        }
    }
}

impl TableConfig {
    /// Config with the given capacity and strategy and resizing disabled.
    pub fn new(capacity: usize, strategy: ProbeStrategy) -> Self {
        Self {
            capacity,
            strategy,
            ..Self::default()
        }
    }

    /// Sets the requested capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the probe strategy.
    pub fn with_strategy(mut self, strategy: ProbeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the growth threshold. Values of 1.0 or more never grow a table.
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Sets the shrink threshold. Negative values never shrink a table.
    pub fn with_min_load_factor(mut self, min_load_factor: f64) -> Self {
        self.min_load_factor = min_load_factor;
        self
    }

    /// Checks the config without building a table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCapacity`] below [`MIN_CAPACITY`] and
    /// [`Error::InvalidLoadFactor`] for a NaN threshold or a maximum that is
    /// not positive. A table that must grow past every load never settles.
    pub fn validate(&self) -> Result<()> {
        if self.capacity < MIN_CAPACITY {
            return Err(Error::InvalidCapacity(self.capacity));
        }
        if self.max_load_factor.is_nan() || self.max_load_factor <= 0.0 {
            return Err(Error::InvalidLoadFactor(self.max_load_factor));
        }
        if self.min_load_factor.is_nan() {
            return Err(Error::InvalidLoadFactor(self.min_load_factor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_resizing() {
        let config = TableConfig::default();
        assert_eq!(config.strategy, ProbeStrategy::Linear);
        assert!(config.max_load_factor >= 1.0);
        assert!(config.min_load_factor < 0.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder() {
        let config = TableConfig::new(5, ProbeStrategy::Quadratic)
            .with_max_load_factor(0.5)
            .with_min_load_factor(0.15);
        assert_eq!(config.capacity, 5);
        assert_eq!(config.strategy, ProbeStrategy::Quadratic);
        assert_eq!(config.max_load_factor, 0.5);
        assert_eq!(config.min_load_factor, 0.15);
    }

    #[test]
    fn validation() {
        assert_eq!(
            TableConfig::default().with_capacity(2).validate(),
            Err(Error::InvalidCapacity(2))
        );
        assert_eq!(
            TableConfig::default().with_capacity(0).validate(),
            Err(Error::InvalidCapacity(0))
        );
        assert!(matches!(
            TableConfig::default()
                .with_max_load_factor(f64::NAN)
                .validate(),
            Err(Error::InvalidLoadFactor(_))
        ));
        assert!(matches!(
            TableConfig::default()
                .with_min_load_factor(f64::NAN)
                .validate(),
            Err(Error::InvalidLoadFactor(_))
        ));
        assert_eq!(
            TableConfig::default().with_max_load_factor(0.0).validate(),
            Err(Error::InvalidLoadFactor(0.0))
        );
        assert_eq!(
            TableConfig::default().with_max_load_factor(-0.5).validate(),
            Err(Error::InvalidLoadFactor(-0.5))
        );
        assert_eq!(TableConfig::default().with_capacity(3).validate(), Ok(()));
    }
}
