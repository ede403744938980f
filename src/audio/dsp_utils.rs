// DSP helpers for the export path

/// Flush denormals to zero
///
/// Threshold 1e-15, far below 32-bit float noise.
#[inline]
pub fn flush_denormals_to_zero(x: f32) -> f32 {
    if x.abs() < 1e-15 { 0.0 } else { x }
}

/// Soft clipping with tanh
///
/// Several voices can sum past full scale; tanh folds them back into [-1, 1]
/// and is close to linear near zero.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    x.tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_denormals() {
        assert_eq!(flush_denormals_to_zero(1e-20), 0.0);
        assert_eq!(flush_denormals_to_zero(0.1), 0.1);
        assert_eq!(flush_denormals_to_zero(-0.1), -0.1);
    }

    #[test]
    fn test_soft_clip() {
        assert!((soft_clip(0.0) - 0.0).abs() < 0.001);
        assert!((soft_clip(0.5) - 0.462).abs() < 0.01);

        assert!(soft_clip(10.0) <= 1.0);
        assert!(soft_clip(10.0) > 0.99);
        assert!(soft_clip(-10.0) >= -1.0);
        assert!(soft_clip(-10.0) < -0.99);
    }
}
