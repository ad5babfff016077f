use crate::grid::Grid;
use ndarray::Array2;

/// Static background brightness distribution on the source-plane lattice.
///
/// A radially symmetric Gaussian centred on the origin, built once at startup
/// and read-only afterwards. Indexed `[row = y, col = x]` to match the grid.
pub struct SourceField {
    pub values: Array2<f64>,
}

impl SourceField {
    /// Evaluate `exp(-(x^2 + y^2) / width)` over every grid cell.
    pub fn build(grid: &Grid, width: f64) -> Self {
        let n = grid.n;
        let coords = grid.coords();
        let mut values = Array2::zeros((n, n));

        for (row, &y) in coords.iter().enumerate() {
            for (col, &x) in coords.iter().enumerate() {
                values[[row, col]] = (-(x * x + y * y) / width).exp();
            }
        }

        Self { values }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Total brightness of the undistorted field.
    pub fn total_brightness(&self) -> f64 {
        self.values.sum()
    }
}
