use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Linear RGB color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Packs into RGBA with the given alpha.
    #[must_use]
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Initial spatial state chosen by a movement policy at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnState {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Spatial and visual state of one instance.
///
/// `id` equals the entity's index in its pool and in the transform buffer.
#[derive(Debug, Clone)]
pub struct InstancedEntity {
    pub id: usize,
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Color,
    pub visible: bool,

    transform: Mat4,
    dirty: bool,
}

impl InstancedEntity {
    #[must_use]
    pub fn new(id: usize, spawn: SpawnState) -> Self {
        Self {
            id,
            position: spawn.position,
            velocity: spawn.velocity,
            color: Color::WHITE,
            visible: true,
            transform: Mat4::from_translation(spawn.position),
            dirty: true,
        }
    }

    /// Last transform produced by [`update_transform`](Self::update_transform).
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rebuilds the transform from `position` and clears the dirty flag.
    ///
    /// Returns whether the matrix changed.
    pub fn update_transform(&mut self) -> bool {
        let next = Mat4::from_translation(self.position);
        let changed = next != self.transform;
        self.transform = next;
        self.dirty = false;
        changed
    }
}
