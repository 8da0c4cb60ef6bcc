//! Asset Boundary
//!
//! Rig decoding is external. This module defines the async interface the
//! decoder is consumed through ([`RigLoader`]), two loaders (JSON manifests
//! on disk and an in-memory table), and [`RigStorage`], which tracks each
//! requested rig as pending, ready or failed.

pub mod io;
pub mod storage;

pub use io::{LoadedRig, ManifestLoader, MemoryLoader, RigLoader};
pub use storage::{RigHandle, RigSlot, RigStorage};
