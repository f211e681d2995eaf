pub mod density;
pub mod pressure;

use std::f32::consts::PI;

/// Scale applied to both radius and distance before evaluating a kernel.
///
/// Keeps kernel magnitudes in a usable range for pixel-sized radii.
pub const UNIT_SCALE: f32 = 0.001;

/// Smoothing kernel for SPH density estimation.
///
/// With `R = radius * UNIT_SCALE` and `D = dst * UNIT_SCALE`, returns
/// `(R - D)^2 / V` where `V = PI * R^4 / 6`, and `0.0` when `dst >= radius`.
#[inline]
pub fn smoothing_kernel(radius: f32, dst: f32) -> f32 {
    let radius = radius * UNIT_SCALE;
    let dst = dst * UNIT_SCALE;
    if dst >= radius {
        return 0.0;
    }
    let volume = PI * radius.powi(4) / 6.0;
    (radius - dst) * (radius - dst) / volume
}

/// Slope of [`smoothing_kernel`] with respect to the scaled distance.
///
/// Returns `(D - R) * 12 / (PI * R^4)` inside the support, so the value is
/// negative and grows in magnitude toward the centre.
#[inline]
pub fn smoothing_kernel_derivative(radius: f32, dst: f32) -> f32 {
    let radius = radius * UNIT_SCALE;
    let dst = dst * UNIT_SCALE;
    if dst >= radius {
        return 0.0;
    }
    let scale = 12.0 / (radius.powi(4) * PI);
    (dst - radius) * scale
}
