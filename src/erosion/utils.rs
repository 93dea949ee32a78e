//! Sampling helpers shared by the erosion simulation

use crate::tilemap::Tilemap;

/// Bilinear interpolation between four cell values
pub fn bilinear_interpolate(v00: f32, v10: f32, v01: f32, v11: f32, fx: f32, fy: f32) -> f32 {
    v00 * (1.0 - fx) * (1.0 - fy)
        + v10 * fx * (1.0 - fy)
        + v01 * (1.0 - fx) * fy
        + v11 * fx * fy
}

/// Interpolated height and analytic gradient at a fractional position.
///
/// Both come from the same four surrounding cells, so the gradient is exact
/// for the interpolated surface. The caller guarantees (x, y) lies inside
/// [0, width-1) x [0, height-1).
pub fn height_and_gradient(elevation: &Tilemap<f32>, x: f32, y: f32) -> (f32, f32, f32) {
    let cx = x as usize;
    let cy = y as usize;
    let u = x - cx as f32;
    let v = y - cy as f32;

    let h_nw = *elevation.get(cx, cy);
    let h_ne = *elevation.get(cx + 1, cy);
    let h_sw = *elevation.get(cx, cy + 1);
    let h_se = *elevation.get(cx + 1, cy + 1);

    let grad_x = (h_ne - h_nw) * (1.0 - v) + (h_se - h_sw) * v;
    let grad_y = (h_sw - h_nw) * (1.0 - u) + (h_se - h_ne) * u;
    let height = bilinear_interpolate(h_nw, h_ne, h_sw, h_se, u, v);

    (height, grad_x, grad_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilinear_corners() {
        assert_eq!(bilinear_interpolate(1.0, 2.0, 3.0, 4.0, 0.0, 0.0), 1.0);
        assert_eq!(bilinear_interpolate(1.0, 2.0, 3.0, 4.0, 1.0, 0.0), 2.0);
        assert_eq!(bilinear_interpolate(1.0, 2.0, 3.0, 4.0, 0.0, 1.0), 3.0);
        assert_eq!(bilinear_interpolate(1.0, 2.0, 3.0, 4.0, 1.0, 1.0), 4.0);
    }

    #[test]
    fn test_gradient_points_uphill_on_ramp() {
        // Elevation increases with x, flat in y.
        let mut map = Tilemap::new_with(4, 4, 0.0f32);
        for (x, _, cell) in map.iter_mut() {
            *cell = x as f32 * 0.1;
        }

        let (height, gx, gy) = height_and_gradient(&map, 1.5, 1.5);
        assert!((height - 0.15).abs() < 1e-6);
        assert!((gx - 0.1).abs() < 1e-6);
        assert!(gy.abs() < 1e-6);
    }
}
