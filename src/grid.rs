/// Evenly spaced coordinate axis shared by the image plane and the source plane.
///
/// The same lattice is used for both planes: lensed source-plane coordinates
/// are discretised back onto this axis when gathering brightness values.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    pub n: usize,  // Number of samples along the axis
    pub min: f64,  // Physical coordinate of sample 0
    pub max: f64,  // Physical coordinate of sample n-1
}

impl Grid {
    pub fn new(n: usize, min: f64, max: f64) -> Self {
        // Config validation rejects degenerate axes before anything renders,
        // but direct construction must fail just as loudly: a single-sample
        // or empty axis would divide by zero in spacing().
        assert!(n >= 2, "grid needs at least two samples, got {}", n);
        assert!(
            min < max,
            "grid span must be non-empty, got [{}, {}]",
            min,
            max
        );
        Grid { n, min, max }
    }

    /// Axis centred on the origin with half-width `half_extent`.
    pub fn centred(n: usize, half_extent: f64) -> Self {
        Self::new(n, -half_extent, half_extent)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn spacing(&self) -> f64 {
        self.span() / (self.n - 1) as f64
    }

    /// Physical coordinate of sample `i`.
    pub fn coord(&self, i: usize) -> f64 {
        self.min + self.spacing() * (i as f64)
    }

    /// All sample coordinates in order, min to max.
    pub fn coords(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.coord(i)).collect()
    }

    /// Discretise a continuous coordinate into a sample index.
    ///
    /// Linear rescale onto [0, n-1], truncated toward zero and clamped to the
    /// axis. Coordinates outside [min, max] collapse to the nearest edge
    /// sample rather than being discarded.
    pub fn index_of(&self, beta: f64) -> usize {
        let scaled = (beta - self.min) / self.span() * (self.n - 1) as f64;
        // `as usize` truncates toward zero and saturates below at 0,
        // so only the upper edge needs an explicit clamp.
        (scaled as usize).min(self.n - 1)
    }

    /// `m` evenly spaced coordinates over [min, max] (endpoints included).
    ///
    /// Used for the light curve sweep, which samples a different count than
    /// the grid resolution.
    pub fn linspace(min: f64, max: f64, m: usize) -> Vec<f64> {
        debug_assert!(m >= 2);
        let step = (max - min) / (m - 1) as f64;
        (0..m).map(|i| min + step * (i as f64)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_span_the_interval_uniformly() {
        let g = Grid::centred(5, 2.0);
        let c = g.coords();
        assert_eq!(c.len(), 5);
        assert_eq!(c[0], -2.0);
        assert_eq!(c[4], 2.0);
        assert!((g.spacing() - 1.0).abs() < 1e-12);
        for w in c.windows(2) {
            assert!((w[1] - w[0] - g.spacing()).abs() < 1e-12);
        }
    }

    #[test]
    fn index_of_hits_exact_endpoints() {
        let g = Grid::centred(300, 2.0);
        assert_eq!(g.index_of(g.min), 0);
        assert_eq!(g.index_of(g.max), g.n - 1);
    }

    #[test]
    fn index_of_clamps_out_of_range_coordinates() {
        let g = Grid::centred(10, 2.0);
        assert_eq!(g.index_of(-100.0), 0);
        assert_eq!(g.index_of(100.0), g.n - 1);
    }

    #[test]
    fn index_of_truncates_toward_zero() {
        // Spacing 1.0 over [0, 9]: 4.99 lands in cell 4, not 5.
        let g = Grid::new(10, 0.0, 9.0);
        assert_eq!(g.index_of(4.99), 4);
        assert_eq!(g.index_of(5.0), 5);
    }

    #[test]
    #[should_panic(expected = "at least two samples")]
    fn single_sample_axis_is_rejected() {
        let _ = Grid::new(1, -2.0, 2.0);
    }

    #[test]
    #[should_panic(expected = "span must be non-empty")]
    fn empty_span_is_rejected() {
        let _ = Grid::new(10, 2.0, 2.0);
    }

    #[test]
    fn linspace_matches_grid_coords() {
        let g = Grid::new(7, -1.5, 1.5);
        let ls = Grid::linspace(-1.5, 1.5, 7);
        for (a, b) in g.coords().iter().zip(ls.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
