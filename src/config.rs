//! Manager configuration.

/// Creation parameters of a [`Manager`][crate::manager::Manager].
///
/// ```
/// use rcbdd::config::BddConfig;
/// use rcbdd::manager::Manager;
///
/// let config = BddConfig::default().with_num_vars(8).with_cache_size(1 << 12);
/// let mgr = Manager::with_config(config).unwrap();
/// assert_eq!(mgr.num_vars().unwrap(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BddConfig {
    /// Number of variables declared up front.
    pub num_vars: usize,
    /// Initial node table capacity (a hint; the table grows as needed).
    pub table_size: usize,
    /// Number of operation cache slots, rounded up to a power of two.
    pub cache_size: usize,
    /// Dead node count above which garbage is collected at the next safe point.
    pub gc_threshold: usize,
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            num_vars: 0,
            table_size: 1 << 16,
            cache_size: 1 << 16,
            gc_threshold: 1 << 14,
        }
    }
}

impl BddConfig {
    pub fn with_num_vars(mut self, num_vars: usize) -> Self {
        self.num_vars = num_vars;
        self
    }

    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    pub fn with_gc_threshold(mut self, gc_threshold: usize) -> Self {
        self.gc_threshold = gc_threshold;
        self
    }

    /// Cache size expressed in bits (`log2` of the slot count).
    pub(crate) fn cache_bits(&self) -> usize {
        self.cache_size.next_power_of_two().trailing_zeros() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = BddConfig::default()
            .with_num_vars(3)
            .with_table_size(100)
            .with_cache_size(1000)
            .with_gc_threshold(0);
        assert_eq!(config.num_vars, 3);
        assert_eq!(config.table_size, 100);
        assert_eq!(config.cache_size, 1000);
        assert_eq!(config.gc_threshold, 0);
    }

    #[test]
    fn test_cache_bits() {
        assert_eq!(BddConfig::default().with_cache_size(1).cache_bits(), 0);
        assert_eq!(BddConfig::default().with_cache_size(1000).cache_bits(), 10);
        assert_eq!(BddConfig::default().with_cache_size(1024).cache_bits(), 10);
        assert_eq!(BddConfig::default().cache_bits(), 16);
    }
}
