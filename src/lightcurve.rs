use crate::render::ImageRenderer;
use rayon::prelude::*;

/// One sample of the light curve: total image brightness at a lens position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightCurvePoint {
    pub lens_x: f64,
    pub brightness: f64,
}

/// Sweeps a renderer across a sequence of lens positions and reduces each
/// rendered image to its total brightness.
pub struct LightCurveSampler<'a> {
    renderer: &'a ImageRenderer<'a>,
}

impl<'a> LightCurveSampler<'a> {
    pub fn new(renderer: &'a ImageRenderer<'a>) -> Self {
        Self { renderer }
    }

    /// Sample the curve at the given positions, in order.
    ///
    /// One point per input position, same order, no deduplication. The lens
    /// y-coordinate is fixed at 0 in this model.
    pub fn sample(&self, positions: &[f64]) -> Vec<LightCurvePoint> {
        positions
            .iter()
            .map(|&lens_x| LightCurvePoint {
                lens_x,
                brightness: self.renderer.render(lens_x, 0.0).sum(),
            })
            .collect()
    }

    /// Position-parallel variant of [`sample`](Self::sample).
    ///
    /// Renders are independent and the collect preserves input order, so the
    /// output matches the serial version exactly.
    pub fn sample_parallel(&self, positions: &[f64]) -> Vec<LightCurvePoint> {
        positions
            .par_iter()
            .map(|&lens_x| LightCurvePoint {
                lens_x,
                brightness: self.renderer.render_parallel(lens_x, 0.0).sum(),
            })
            .collect()
    }
}
