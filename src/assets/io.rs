use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationClip, ClipLibrary, RigTemplate};
use crate::errors::{Error, Result};

/// Decoded rig as produced by the external asset pipeline.
///
/// Also the on-disk manifest format read by [`ManifestLoader`]:
///
/// ```json
/// { "name": "Soldier", "joints": ["Hips", "Spine"], "clips": [ { "name": "Idle", "duration": 2.0 } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedRig {
    pub name: String,
    #[serde(default)]
    pub joints: Vec<String>,
    pub clips: Vec<AnimationClip>,
}

impl LoadedRig {
    /// Freezes the rig into a shareable template.
    #[must_use]
    pub fn into_template(self) -> Arc<RigTemplate> {
        Arc::new(RigTemplate::new(
            self.name,
            self.joints,
            ClipLibrary::from_clips(self.clips),
        ))
    }
}

/// Asynchronous source of rigs.
///
/// Loading is the only asynchronous boundary of the crate: it resolves (or
/// fails) before any entity is given the rig.
pub trait RigLoader: Send + Sync {
    fn load(&self, url: &str) -> impl Future<Output = Result<LoadedRig>> + Send;
}

/// Reads JSON rig manifests relative to a root directory.
///
/// File reads go through `tokio::fs`, so loads must be driven from inside a
/// tokio runtime.
pub struct ManifestLoader {
    root_path: PathBuf,
}

impl ManifestLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let root_path = if path.is_file() {
            path.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            path.to_path_buf()
        };
        Self { root_path }
    }

    #[inline]
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

impl RigLoader for ManifestLoader {
    async fn load(&self, url: &str) -> Result<LoadedRig> {
        let path = self.root_path.join(url);
        let fail = |reason: String| Error::AssetLoad {
            url: url.to_string(),
            reason,
        };

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| fail(e.to_string()))?;
        let rig: LoadedRig = serde_json::from_slice(&bytes).map_err(|e| fail(e.to_string()))?;
        log::info!(
            "Loaded rig '{}' from {}: {} joints, {} clips",
            rig.name,
            path.display(),
            rig.joints.len(),
            rig.clips.len()
        );
        Ok(rig)
    }
}

/// Serves rigs registered up front. Unknown urls fail.
#[derive(Default)]
pub struct MemoryLoader {
    rigs: FxHashMap<String, LoadedRig>,
}

impl MemoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rig(mut self, url: impl Into<String>, rig: LoadedRig) -> Self {
        self.rigs.insert(url.into(), rig);
        self
    }
}

impl RigLoader for MemoryLoader {
    async fn load(&self, url: &str) -> Result<LoadedRig> {
        self.rigs.get(url).cloned().ok_or_else(|| Error::AssetLoad {
            url: url.to_string(),
            reason: "not registered".to_string(),
        })
    }
}
