//! Rig Asset Tests
//!
//! Tests for:
//! - MemoryLoader and ManifestLoader
//! - RigStorage: reserve deduplication, ready / failed slots, retry
//! - Concurrent loading with load_all
//! - Loaded rigs driving a Simulation

use std::sync::atomic::{AtomicUsize, Ordering};

use marionette::animation::{AnimationClip, AnimationRole};
use marionette::assets::{LoadedRig, ManifestLoader, MemoryLoader, RigLoader, RigSlot, RigStorage};
use marionette::config::ScenarioConfig;
use marionette::errors::Error;
use marionette::simulation::Simulation;

fn soldier_rig() -> LoadedRig {
    LoadedRig {
        name: "Soldier".to_string(),
        joints: vec!["Hips".to_string(), "Spine".to_string()],
        clips: vec![
            AnimationClip::new("Idle", 2.0),
            AnimationClip::new("Walk", 1.0),
            AnimationClip::new("Run", 0.5),
        ],
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn loader() -> MemoryLoader {
    MemoryLoader::new().with_rig("models/Soldier.glb", soldier_rig())
}

// ============================================================================
// Loaders
// ============================================================================

#[test]
fn memory_loader_serves_registered_rigs() {
    let rig = pollster::block_on(loader().load("models/Soldier.glb")).unwrap();
    assert_eq!(rig, soldier_rig());
}

#[test]
fn memory_loader_rejects_unknown_url() {
    let err = pollster::block_on(loader().load("models/Missing.glb")).unwrap_err();
    assert!(matches!(err, Error::AssetLoad { ref url, .. } if url == "models/Missing.glb"));
}

#[tokio::test]
async fn manifest_loader_reads_json_from_root() -> anyhow::Result<()> {
    init_logger();
    let dir = std::env::temp_dir().join(format!("marionette-manifest-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("soldier.json"), serde_json::to_string(&soldier_rig())?)?;
    std::fs::write(dir.join("broken.json"), "{ not json")?;

    let loader = ManifestLoader::new(&dir);
    assert_eq!(loader.root_path(), dir.as_path());

    let rig = loader.load("soldier.json").await?;
    assert_eq!(rig.name, "Soldier");
    assert_eq!(rig.clips.len(), 3);

    assert!(matches!(
        loader.load("broken.json").await,
        Err(Error::AssetLoad { .. })
    ));
    assert!(matches!(
        loader.load("absent.json").await,
        Err(Error::AssetLoad { .. })
    ));

    std::fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[tokio::test]
async fn manifest_rigs_load_concurrently() -> anyhow::Result<()> {
    init_logger();
    let dir = std::env::temp_dir().join(format!("marionette-concurrent-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    for name in ["a", "b", "c"] {
        let rig = LoadedRig {
            name: name.to_string(),
            ..soldier_rig()
        };
        std::fs::write(dir.join(format!("{name}.json")), serde_json::to_string(&rig)?)?;
    }

    let loader = ManifestLoader::new(&dir);
    let mut storage = RigStorage::new();
    let handles = storage
        .load_all(&loader, &["a.json", "b.json", "c.json"])
        .await;
    let names: Vec<String> = handles
        .iter()
        .filter_map(|h| storage.get(*h))
        .map(|t| t.name.clone())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);

    std::fs::remove_dir_all(&dir).ok();
    Ok(())
}

#[test]
fn manifest_joints_are_optional() {
    let rig: LoadedRig =
        serde_json::from_str(r#"{ "name": "Bare", "clips": [ { "name": "Idle", "duration": 1.0 } ] }"#)
            .unwrap();
    assert!(rig.joints.is_empty());
    assert_eq!(rig.clips[0].name, "Idle");
}

// ============================================================================
// RigStorage
// ============================================================================

#[test]
fn reserve_deduplicates_by_url() {
    let mut storage = RigStorage::new();
    let a = storage.reserve("a.glb");
    let b = storage.reserve("b.glb");
    assert_ne!(a, b);
    assert_eq!(storage.reserve("a.glb"), a);
    assert_eq!(storage.len(), 2);
    assert!(storage.slot(a).unwrap().is_pending());
    assert!(storage.get(a).is_none());
    assert_eq!(storage.handle("b.glb"), Some(b));
    assert_eq!(storage.handle("c.glb"), None);
}

#[test]
fn load_marks_slot_ready() {
    let mut storage = RigStorage::new();
    let handle = pollster::block_on(storage.load(&loader(), "models/Soldier.glb"));

    let template = storage.get(handle).unwrap();
    assert_eq!(template.name, "Soldier");
    assert_eq!(template.clips.clips().len(), 3);

    // A ready slot is not reloaded
    let again = pollster::block_on(storage.load(&MemoryLoader::new(), "models/Soldier.glb"));
    assert_eq!(again, handle);
    assert!(storage.get(handle).is_some());
}

#[test]
fn failed_load_is_recorded_and_retried() {
    let mut storage = RigStorage::new();
    let handle = pollster::block_on(storage.load(&MemoryLoader::new(), "models/Soldier.glb"));
    assert!(matches!(storage.slot(handle), Some(RigSlot::Failed(_))));
    assert!(storage.get(handle).is_none());

    let retried = pollster::block_on(storage.load(&loader(), "models/Soldier.glb"));
    assert_eq!(retried, handle);
    assert!(storage.get(handle).is_some());
}

#[test]
fn load_all_resolves_each_url() {
    let loader = loader().with_rig(
        "models/Robot.glb",
        LoadedRig {
            name: "Robot".to_string(),
            joints: Vec::new(),
            clips: vec![AnimationClip::new("Dance", 3.0)],
        },
    );
    let mut storage = RigStorage::new();
    let handles = pollster::block_on(storage.load_all(
        &loader,
        &["models/Soldier.glb", "models/Robot.glb", "models/Nope.glb"],
    ));

    assert_eq!(handles.len(), 3);
    assert_eq!(storage.get(handles[0]).unwrap().name, "Soldier");
    assert_eq!(storage.get(handles[1]).unwrap().name, "Robot");
    assert!(matches!(storage.slot(handles[2]), Some(RigSlot::Failed(_))));
}

#[test]
fn load_all_keeps_ready_slots() {
    init_logger();
    let mut storage = RigStorage::new();
    let handle = pollster::block_on(storage.load(&loader(), "models/Soldier.glb"));

    // A loader that knows nothing must not downgrade an already loaded rig
    let handles = pollster::block_on(
        storage.load_all(&MemoryLoader::new(), &["models/Soldier.glb", "models/Other.glb"]),
    );
    assert_eq!(handles[0], handle);
    assert_eq!(storage.get(handle).unwrap().name, "Soldier");
    assert!(matches!(storage.slot(handles[1]), Some(RigSlot::Failed(_))));
}

#[derive(Default)]
struct CountingLoader {
    inner: MemoryLoader,
    calls: AtomicUsize,
}

impl RigLoader for CountingLoader {
    async fn load(&self, url: &str) -> marionette::Result<LoadedRig> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.load(url).await
    }
}

#[test]
fn load_all_fetches_repeated_url_once() {
    let loader = CountingLoader {
        inner: loader(),
        ..CountingLoader::default()
    };
    let mut storage = RigStorage::new();
    let handles = pollster::block_on(storage.load_all(
        &loader,
        &["models/Soldier.glb", "models/Soldier.glb"],
    ));

    assert_eq!(handles.len(), 2);
    assert_eq!(handles[0], handles[1]);
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    assert!(storage.get(handles[0]).is_some());
}

// ============================================================================
// Loaded rigs in a simulation
// ============================================================================

#[test]
fn loaded_rig_animates_entity() {
    let mut storage = RigStorage::new();
    let handle = pollster::block_on(storage.load(&loader(), "models/Soldier.glb"));
    let template = storage.get(handle).unwrap();

    let mut sim = Simulation::from_config(&ScenarioConfig::soldier_conveyor()).unwrap();
    sim.attach_rig(0, &template).unwrap();
    sim.set_active_role(0, AnimationRole::Run).unwrap();
    sim.tick(0.1);

    let pose = sim.pose(0).unwrap();
    assert_eq!(pose.dominant().unwrap().clip.name, "Run");
}

#[test]
fn rig_without_role_clips_stays_static() {
    let mut storage = RigStorage::new();
    let loader = MemoryLoader::new().with_rig(
        "robot.json",
        LoadedRig {
            name: "Robot".to_string(),
            joints: Vec::new(),
            clips: vec![AnimationClip::new("Dance", 3.0)],
        },
    );
    let handle = pollster::block_on(storage.load(&loader, "robot.json"));
    let template = storage.get(handle).unwrap();

    let mut sim = Simulation::from_config(&ScenarioConfig::soldier_conveyor()).unwrap();
    sim.attach_rig(0, &template).unwrap();
    sim.tick(0.1);
    assert!(sim.pose(0).unwrap().is_static());
    assert!(!sim.mixer(0).unwrap().is_animated());
}
