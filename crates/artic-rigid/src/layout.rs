//! Strides of the flat-array interface.
//!
//! Every per-joint buffer is a contiguous run of fixed-size records. Buffers
//! holding per-body velocity or acceleration have one extra leading record
//! for the base body.

use artic_math::SpatialInertia;

/// Parent-offset translation, in the parent frame.
pub const TRANSLATION_STRIDE: usize = 3;
/// Compact spatial inertia: row-major rotational inertia, CoM offset, mass.
pub const INERTIA_STRIDE: usize = SpatialInertia::FLAT_LEN;
/// Joint rotation quaternion, scalar first.
pub const QUAT_STRIDE: usize = 4;
/// Local angular velocity or acceleration.
pub const ANGULAR_STRIDE: usize = 3;
/// Spatial vector, angular part first.
pub const SPATIAL_STRIDE: usize = 6;

/// Range of record `index` in a buffer of records of size `stride`.
#[inline]
pub fn record(index: usize, stride: usize) -> std::ops::Range<usize> {
    index * stride..(index + 1) * stride
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ranges() {
        assert_eq!(record(0, QUAT_STRIDE), 0..4);
        assert_eq!(record(2, SPATIAL_STRIDE), 12..18);
        assert_eq!(INERTIA_STRIDE, 13);
    }
}
