//! Instanced Transform Buffer Tests
//!
//! Tests for:
//! - Exact read-back of written transforms and colors
//! - Out-of-range access (error, no mutation)
//! - Coarse and color-only dirty flags
//! - Packed upload layout

use glam::{Mat4, Quat, Vec3};

use marionette::errors::Error;
use marionette::simulation::{Color, InstanceRaw, InstancedTransformBuffer};

#[test]
fn new_buffer_is_identity_white_and_dirty() {
    let mut buffer = InstancedTransformBuffer::new(4);
    assert_eq!(buffer.len(), 4);
    for i in 0..4 {
        assert_eq!(buffer.transform(i).unwrap(), Mat4::IDENTITY);
        assert_eq!(buffer.color(i).unwrap(), Color::WHITE);
        assert!(buffer.is_visible(i).unwrap());
    }
    assert!(buffer.consume_dirty());
    assert!(!buffer.consume_dirty());
}

#[test]
fn set_then_get_returns_exact_value() {
    let mut buffer = InstancedTransformBuffer::new(8);
    let transform = Mat4::from_scale_rotation_translation(
        Vec3::new(0.5, 2.0, 1.0),
        Quat::from_rotation_y(0.3),
        Vec3::new(-3.25, 0.0, 7.125),
    );
    let color = Color::new(0.2, 0.4, 0.6);

    for i in 0..8 {
        buffer.set_transform(i, transform * Mat4::from_translation(Vec3::X * i as f32)).unwrap();
        buffer.set_color(i, color).unwrap();
    }
    for i in 0..8 {
        assert_eq!(
            buffer.transform(i).unwrap(),
            transform * Mat4::from_translation(Vec3::X * i as f32)
        );
        assert_eq!(buffer.color(i).unwrap(), color);
    }
}

#[test]
fn out_of_range_write_fails_without_mutation() {
    let mut buffer = InstancedTransformBuffer::new(3);
    buffer.consume_dirty();
    let version = buffer.version();

    let err = buffer
        .set_transform(3, Mat4::from_translation(Vec3::ONE))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::IndexOutOfRange {
            index: 3,
            count: 3,
            ..
        }
    ));
    assert!(buffer.set_color(usize::MAX, Color::RED).is_err());

    assert!(!buffer.is_dirty());
    assert_eq!(buffer.version(), version);
    assert!(buffer.transforms().iter().all(|t| *t == Mat4::IDENTITY));
    assert!(buffer.colors().iter().all(|c| *c == Color::WHITE));
}

#[test]
fn out_of_range_read_fails() {
    let buffer = InstancedTransformBuffer::new(2);
    assert!(buffer.transform(2).is_err());
    assert!(buffer.color(2).is_err());
    assert!(buffer.is_visible(2).is_err());
}

#[test]
fn any_single_write_dirties_whole_buffer() {
    let mut buffer = InstancedTransformBuffer::new(100);
    buffer.consume_dirty();
    buffer.consume_colors_dirty();

    buffer.set_transform(57, Mat4::from_translation(Vec3::Y)).unwrap();
    assert!(buffer.is_dirty());
    assert!(!buffer.consume_colors_dirty());
    assert!(buffer.consume_dirty());
    assert!(!buffer.is_dirty());
}

#[test]
fn color_write_raises_both_flags() {
    let mut buffer = InstancedTransformBuffer::new(2);
    buffer.consume_dirty();
    buffer.consume_colors_dirty();

    buffer.set_color(1, Color::RED).unwrap();
    assert!(buffer.consume_colors_dirty());
    assert!(buffer.consume_dirty());
}

#[test]
fn writes_between_consumes_are_never_lost() {
    let mut buffer = InstancedTransformBuffer::new(2);
    buffer.consume_dirty();

    buffer.set_transform(0, Mat4::from_translation(Vec3::X)).unwrap();
    buffer.set_transform(1, Mat4::from_translation(Vec3::Z)).unwrap();
    assert!(buffer.consume_dirty());
    assert_eq!(buffer.transform(0).unwrap(), Mat4::from_translation(Vec3::X));
    assert_eq!(buffer.transform(1).unwrap(), Mat4::from_translation(Vec3::Z));
}

#[test]
fn packed_records_follow_buffer_order() {
    let mut buffer = InstancedTransformBuffer::new(2);
    buffer.set_transform(1, Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))).unwrap();
    buffer.set_color(1, Color::RED).unwrap();
    buffer.set_visible(0, false).unwrap();

    let packed = buffer.packed();
    assert_eq!(packed.len(), 2);
    assert_eq!(packed[0].color, [1.0, 1.0, 1.0, 0.0]);
    assert_eq!(packed[1].color, [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(packed[1].model[3], [1.0, 2.0, 3.0, 1.0]);

    let bytes = buffer.as_bytes();
    assert_eq!(bytes.len(), 2 * std::mem::size_of::<InstanceRaw>());
    let round: Vec<InstanceRaw> = bytes
        .chunks_exact(std::mem::size_of::<InstanceRaw>())
        .map(bytemuck::pod_read_unaligned)
        .collect();
    assert_eq!(round, packed);
    assert_eq!(buffer.visible_count(), 1);
}
