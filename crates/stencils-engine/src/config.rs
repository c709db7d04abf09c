//! Traversal configuration.

/// Configuration for a mapping pass.
///
/// Controls whether the index domain is split across the rayon thread
/// pool. Parallel and sequential passes produce identical results; every
/// center writes exactly one destination cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapConfig {
    /// Partition the index domain across rayon workers.
    ///
    /// Default: `true`.
    pub parallel: bool,

    /// Passes over fewer cells than this run sequentially even when
    /// `parallel` is set.
    ///
    /// Default: 4096.
    pub min_parallel_cells: usize,
}

impl MapConfig {
    /// Default parallel threshold in cells.
    pub const DEFAULT_MIN_PARALLEL_CELLS: usize = 4096;

    /// Parallel traversal with the default threshold.
    pub fn new() -> Self {
        Self {
            parallel: true,
            min_parallel_cells: Self::DEFAULT_MIN_PARALLEL_CELLS,
        }
    }

    /// Always traverse on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::new()
        }
    }

    /// Set the parallel threshold.
    pub fn with_min_parallel_cells(mut self, cells: usize) -> Self {
        self.min_parallel_cells = cells;
        self
    }

    /// Whether a pass over `cells` centers runs in parallel.
    pub fn runs_parallel(&self, cells: usize) -> bool {
        self.parallel && cells >= self.min_parallel_cells
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold() {
        let config = MapConfig::default();
        assert!(config.parallel);
        assert_eq!(config.min_parallel_cells, 4096);
        assert!(!config.runs_parallel(4095));
        assert!(config.runs_parallel(4096));
    }

    #[test]
    fn sequential_never_parallel() {
        let config = MapConfig::sequential().with_min_parallel_cells(0);
        assert!(!config.runs_parallel(usize::MAX));
    }
}
