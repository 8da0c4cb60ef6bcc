//! Instanced Transform Buffer
//!
//! Renderer-facing storage for per-instance transforms, colors and
//! visibility, laid out as parallel arrays indexed by entity id.
//!
//! # Dirty Tracking
//!
//! Invalidation is coarse: any write marks the whole buffer dirty. Color
//! writes additionally raise a color-only flag so a renderer that uploads
//! colors to a separate attribute stream can skip that upload. Both flags
//! are cleared only by their `consume_*` call, so every write made since the
//! last consume is observed.
//!
//! A version counter increments on every successful write and never resets,
//! for consumers that poll instead of consuming.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::errors::{Error, Result};
use crate::simulation::entity::Color;

/// GPU-ready per-instance record.
///
/// Alpha is 0 for hidden instances.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct InstancedTransformBuffer {
    transforms: Vec<Mat4>,
    colors: Vec<Color>,
    visible: Vec<bool>,

    dirty: bool,
    colors_dirty: bool,
    version: u64,
}

impl InstancedTransformBuffer {
    /// Identity transforms, white, visible. Starts dirty so the first frame
    /// uploads.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            transforms: vec![Mat4::IDENTITY; count],
            colors: vec![Color::WHITE; count],
            visible: vec![true; count],
            dirty: true,
            colors_dirty: true,
            version: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    fn check(&self, context: &'static str, index: usize) -> Result<()> {
        if index < self.len() {
            Ok(())
        } else {
            Err(Error::out_of_range(context, index, self.len()))
        }
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.version = self.version.wrapping_add(1);
    }

    // ========================================================================
    // Writes
    // ========================================================================

    pub fn set_transform(&mut self, index: usize, transform: Mat4) -> Result<()> {
        self.check("instance transform", index)?;
        self.transforms[index] = transform;
        self.touch();
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, color: Color) -> Result<()> {
        self.check("instance color", index)?;
        self.colors[index] = color;
        self.colors_dirty = true;
        self.touch();
        Ok(())
    }

    pub fn set_visible(&mut self, index: usize, visible: bool) -> Result<()> {
        self.check("instance visibility", index)?;
        self.visible[index] = visible;
        self.touch();
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn transform(&self, index: usize) -> Result<Mat4> {
        self.check("instance transform", index)?;
        Ok(self.transforms[index])
    }

    pub fn color(&self, index: usize) -> Result<Color> {
        self.check("instance color", index)?;
        Ok(self.colors[index])
    }

    pub fn is_visible(&self, index: usize) -> Result<bool> {
        self.check("instance visibility", index)?;
        Ok(self.visible[index])
    }

    #[must_use]
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    // ========================================================================
    // Dirty state
    // ========================================================================

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the dirty flag and clears it. Call once per frame after upload.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn consume_colors_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.colors_dirty, false)
    }

    /// Successful writes since creation. Failed writes do not count.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ========================================================================
    // Packing
    // ========================================================================

    /// Interleaves the parallel arrays into upload records.
    #[must_use]
    pub fn packed(&self) -> Vec<InstanceRaw> {
        self.transforms
            .iter()
            .zip(&self.colors)
            .zip(&self.visible)
            .map(|((transform, color), visible)| InstanceRaw {
                model: transform.to_cols_array_2d(),
                color: color.to_rgba(if *visible { 1.0 } else { 0.0 }),
            })
            .collect()
    }

    /// Packed records as raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.packed()).to_vec()
    }
}
