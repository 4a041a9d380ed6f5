use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;

/// Threshold for determining whether to use parallel or sequential processing (number of rows)
const ROW_PARALLEL_THRESHOLD: usize = 64;

/// Compute backend used to evaluate per-sample loss terms.
///
/// The backend only decides *how* rows are visited. Per-row values are always
/// reduced in row order afterwards, so both variants produce bit-identical
/// results.
///
/// # Variants
///
/// - `Sequential` - Rows are evaluated one after another on the calling thread
/// - `Parallel` - Rows are distributed over the rayon global thread pool once the batch is large enough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeBackend {
    Sequential,
    Parallel,
}

impl ComputeBackend {
    /// Selects a backend according to what the current process has available.
    ///
    /// Picks `Parallel` when the rayon global pool has more than one worker,
    /// `Sequential` otherwise.
    ///
    /// # Returns
    ///
    /// * `ComputeBackend` - The selected backend
    pub fn select() -> Self {
        let threads = rayon::current_num_threads();
        let backend = if threads > 1 {
            ComputeBackend::Parallel
        } else {
            ComputeBackend::Sequential
        };
        log::debug!(
            "Selected {:?} compute backend ({} worker threads available)",
            backend,
            threads
        );
        backend
    }

    fn use_parallel(&self, rows: usize) -> bool {
        *self == ComputeBackend::Parallel && rows >= ROW_PARALLEL_THRESHOLD
    }

    /// Evaluates `f` for every row index in `0..rows`.
    ///
    /// # Parameters
    ///
    /// - `rows` - Number of rows to evaluate
    /// - `f` - Function mapping a row index to that row's value
    ///
    /// # Returns
    ///
    /// * `Vec<f32>` - One value per row, in row order
    pub fn map_rows<F>(&self, rows: usize, f: F) -> Vec<f32>
    where
        F: Fn(usize) -> f32 + Sync + Send,
    {
        if self.use_parallel(rows) {
            (0..rows).into_par_iter().map(f).collect()
        } else {
            (0..rows).map(f).collect()
        }
    }

    /// Averages `f` over every row index in `0..rows`.
    ///
    /// The summation always runs sequentially over the collected row values.
    ///
    /// # Parameters
    ///
    /// - `rows` - Number of rows to evaluate, must be non-zero
    /// - `f` - Function mapping a row index to that row's value
    ///
    /// # Returns
    ///
    /// * `f32` - Mean of the row values
    pub fn mean_rows<F>(&self, rows: usize, f: F) -> f32
    where
        F: Fn(usize) -> f32 + Sync + Send,
    {
        let values = self.map_rows(rows, f);
        values.iter().sum::<f32>() / rows as f32
    }

    /// Fills every row of `output` in place with `f`.
    ///
    /// # Parameters
    ///
    /// - `output` - Matrix whose rows are written
    /// - `f` - Function receiving the row index and a mutable view of that row
    pub fn for_each_row_mut<F>(&self, output: &mut Array2<f32>, f: F)
    where
        F: Fn(usize, ArrayViewMut1<f32>) + Sync + Send,
    {
        if self.use_parallel(output.nrows()) {
            output
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(i, row)| f(i, row));
        } else {
            output
                .axis_iter_mut(Axis(0))
                .enumerate()
                .for_each(|(i, row)| f(i, row));
        }
    }
}

impl Default for ComputeBackend {
    fn default() -> Self {
        ComputeBackend::select()
    }
}
