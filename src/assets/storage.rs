use std::sync::Arc;

use futures::future::join_all;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};

use crate::animation::RigTemplate;
use crate::assets::io::{LoadedRig, RigLoader};
use crate::errors::Result;

new_key_type! {
    pub struct RigHandle;
}

/// Load state of one requested rig.
#[derive(Debug, Clone)]
pub enum RigSlot {
    Pending,
    Ready(Arc<RigTemplate>),
    Failed(String),
}

impl RigSlot {
    #[must_use]
    pub fn template(&self) -> Option<&Arc<RigTemplate>> {
        match self {
            Self::Ready(template) => Some(template),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Rig templates keyed by handle, deduplicated by url.
///
/// Entities only receive a rig once its slot is [`RigSlot::Ready`]; until
/// then (or after a failure) they stay static.
#[derive(Debug, Default)]
pub struct RigStorage {
    slots: SlotMap<RigHandle, RigSlot>,
    lookup: FxHashMap<String, RigHandle>,
}

impl RigStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `url`, creating a pending slot on first use.
    pub fn reserve(&mut self, url: &str) -> RigHandle {
        if let Some(&handle) = self.lookup.get(url) {
            return handle;
        }
        let handle = self.slots.insert(RigSlot::Pending);
        self.lookup.insert(url.to_string(), handle);
        handle
    }

    /// Records the outcome of a load.
    pub fn complete(&mut self, handle: RigHandle, result: Result<LoadedRig>) {
        let Some(slot) = self.slots.get_mut(handle) else {
            log::warn!("Load completed for unknown rig handle {handle:?}");
            return;
        };
        *slot = match result {
            Ok(rig) => RigSlot::Ready(rig.into_template()),
            Err(err) => {
                log::warn!("Rig load failed: {err}");
                RigSlot::Failed(err.to_string())
            }
        };
    }

    /// Loads `url` through `loader` unless it is already ready.
    ///
    /// A failed slot is retried.
    pub async fn load(&mut self, loader: &impl RigLoader, url: &str) -> RigHandle {
        let handle = self.reserve(url);
        if matches!(self.slots.get(handle), Some(RigSlot::Ready(_))) {
            return handle;
        }
        let result = loader.load(url).await;
        self.complete(handle, result);
        handle
    }

    /// Loads several urls concurrently.
    ///
    /// Returns one handle per entry of `urls`, in order. Ready slots are
    /// kept as they are and a url listed twice is fetched once.
    pub async fn load_all(&mut self, loader: &impl RigLoader, urls: &[&str]) -> Vec<RigHandle> {
        let handles: Vec<RigHandle> = urls.iter().map(|url| self.reserve(url)).collect();

        let mut seen = FxHashSet::default();
        let to_fetch: Vec<(RigHandle, &str)> = handles
            .iter()
            .zip(urls)
            .filter(|(handle, _)| seen.insert(**handle))
            .filter(|(handle, _)| !matches!(self.slots.get(**handle), Some(RigSlot::Ready(_))))
            .map(|(&handle, &url)| (handle, url))
            .collect();

        let results = join_all(to_fetch.iter().map(|(_, url)| loader.load(url))).await;
        for ((handle, _), result) in to_fetch.into_iter().zip(results) {
            self.complete(handle, result);
        }
        handles
    }

    #[must_use]
    pub fn slot(&self, handle: RigHandle) -> Option<&RigSlot> {
        self.slots.get(handle)
    }

    #[must_use]
    pub fn get(&self, handle: RigHandle) -> Option<Arc<RigTemplate>> {
        self.slots.get(handle)?.template().cloned()
    }

    #[must_use]
    pub fn handle(&self, url: &str) -> Option<RigHandle> {
        self.lookup.get(url).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
