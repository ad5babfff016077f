use ndarray::{Array2, Zip};

/// Point-mass lens parameters.
#[derive(Debug, Clone, Copy)]
pub struct LensParams {
    pub theta_e: f64, // Einstein radius (deflection strength)
    pub epsilon: f64, // Floor on |p - lens|^2 near the singularity
}

impl LensParams {
    pub fn new(theta_e: f64, epsilon: f64) -> Self {
        Self { theta_e, epsilon }
    }
}

impl Default for LensParams {
    fn default() -> Self {
        Self {
            theta_e: 1.0,
            epsilon: 1e-6,
        }
    }
}

/// Map one image-plane coordinate to its source-plane counterpart.
///
/// Point-mass lens equation: beta = p - theta_E^2 * (p - lens) / |p - lens|^2.
/// The squared offset is floored at `epsilon` so that a lens sitting exactly
/// on a grid node yields a large finite deflection instead of dividing by
/// zero. That floor is a numerical stability clamp, not exact caustic
/// physics: the true point-mass equation is singular at the lens position.
pub fn deflect(
    xi: f64,
    yi: f64,
    lens_x: f64,
    lens_y: f64,
    lens: LensParams,
) -> (f64, f64) {
    let dx = xi - lens_x;
    let dy = yi - lens_y;
    let r2 = (dx * dx + dy * dy).max(lens.epsilon);
    let scale = lens.theta_e * lens.theta_e / r2;
    (xi - scale * dx, yi - scale * dy)
}

/// Apply the lens equation to a whole image-plane mesh at once.
///
/// `xi` and `yi` are the meshed coordinate arrays (same shape); the returned
/// pair holds the source-plane coordinates, shape preserved.
pub fn deflect_mesh(
    xi: &Array2<f64>,
    yi: &Array2<f64>,
    lens_x: f64,
    lens_y: f64,
    lens: LensParams,
) -> (Array2<f64>, Array2<f64>) {
    let mut beta_x = Array2::zeros(xi.dim());
    let mut beta_y = Array2::zeros(yi.dim());

    Zip::from(&mut beta_x)
        .and(&mut beta_y)
        .and(xi)
        .and(yi)
        .for_each(|bx, by, &x, &y| {
            let (b_x, b_y) = deflect(x, y, lens_x, lens_y, lens);
            *bx = b_x;
            *by = b_y;
        });

    (beta_x, beta_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn deflection_points_toward_the_lens() {
        let lens = LensParams::default();
        // Image point to the right of a lens at the origin is pulled left.
        let (bx, by) = deflect(2.0, 0.0, 0.0, 0.0, lens);
        assert!(bx < 2.0);
        assert_eq!(by, 0.0);
        // theta_E = 1 at r = 2: beta_x = 2 - 1 * 2/4 = 1.5
        assert!((bx - 1.5).abs() < 1e-12);
    }

    #[test]
    fn epsilon_floor_keeps_output_finite_at_the_singularity() {
        let lens = LensParams::default();
        let (bx, by) = deflect(0.3, -0.7, 0.3, -0.7, lens);
        assert!(bx.is_finite() && by.is_finite());
    }

    #[test]
    fn far_from_the_lens_the_mapping_approaches_identity() {
        let lens = LensParams::default();
        let (bx, by) = deflect(1000.0, 0.0, 0.0, 0.0, lens);
        assert!((bx - 1000.0).abs() < 1e-2);
        assert_eq!(by, 0.0);
    }

    #[test]
    fn mesh_form_agrees_with_the_scalar_form() {
        let lens = LensParams::new(1.0, 1e-6);
        let xi = array![[0.0, 0.5], [-1.0, 2.0]];
        let yi = array![[0.0, 1.0], [0.5, -0.5]];
        let (bx, by) = deflect_mesh(&xi, &yi, 0.3, 0.0, lens);
        assert_eq!(bx.dim(), xi.dim());
        for ((r, c), &x) in xi.indexed_iter() {
            let (sx, sy) = deflect(x, yi[[r, c]], 0.3, 0.0, lens);
            assert_eq!(bx[[r, c]], sx);
            assert_eq!(by[[r, c]], sy);
        }
    }
}
