// Copyright 2026 the Figura Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 transform used by the 3D projector.

use core::ops::Mul;

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// Creates a rotation around the Z axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            cols: [
                [c, s, 0.0, 0.0],
                [-s, c, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the X axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_x(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Applies the transform to a point (`w = 1`).
    #[inline]
    #[must_use]
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let c = &self.cols;
        let mut out = [0.0; 3];
        for (i, o) in out.iter_mut().enumerate() {
            *o = c[0][i] * p[0] + c[1][i] * p[1] + c[2][i] * p[2] + c[3][i];
        }
        out
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use core::f64::consts::FRAC_PI_2;

    use super::*;

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn rotations_quarter_turn() {
        let rz = Transform3d::from_rotation_z(FRAC_PI_2);
        assert!(close(rz.transform_point([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]));
        let rx = Transform3d::from_rotation_x(FRAC_PI_2);
        assert!(close(rx.transform_point([0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn composed_rotations_apply_right_to_left() {
        let m = Transform3d::from_rotation_x(FRAC_PI_2) * Transform3d::from_rotation_z(FRAC_PI_2);
        // Z turns +X into +Y, then X turns +Y into +Z.
        assert!(close(m.transform_point([1.0, 0.0, 0.0]), [0.0, 0.0, 1.0]));
    }
}
