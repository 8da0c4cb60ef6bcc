//! Headless scenario runner.
//!
//! Usage: `headless [PRESET | path/to/scenario.json] [SECONDS] [path/to/rig.json]`
//!
//! Runs the scenario at a fixed 60 Hz with a rig attached to every entity
//! (the rig manifest if given, a built-in soldier otherwise), cycles the
//! active role every two seconds and logs what a renderer would upload.

use std::path::Path;

use anyhow::{Context, Result, bail};
use marionette::animation::{AnimationClip, AnimationRole};
use marionette::assets::{LoadedRig, ManifestLoader, MemoryLoader, RigHandle, RigStorage};
use marionette::config::ScenarioConfig;
use marionette::simulation::Simulation;

const SOLDIER_URL: &str = "models/Soldier.glb";
const FRAME_DT: f32 = 1.0 / 60.0;
const ROLE_PERIOD: f32 = 2.0;

fn soldier_loader() -> MemoryLoader {
    MemoryLoader::new().with_rig(
        SOLDIER_URL,
        LoadedRig {
            name: "Soldier".to_string(),
            joints: ["Hips", "Spine", "Neck", "Head", "LeftArm", "RightArm"]
                .into_iter()
                .map(String::from)
                .collect(),
            clips: vec![
                AnimationClip::new("TPose", 0.04),
                AnimationClip::new("Idle", 2.0),
                AnimationClip::new("Walk", 1.07),
                AnimationClip::new("Run", 0.73),
            ],
        },
    )
}

fn load_scenario(arg: Option<&str>) -> Result<ScenarioConfig> {
    let Some(arg) = arg else {
        return Ok(ScenarioConfig::default());
    };
    if let Some(preset) = ScenarioConfig::preset(arg) {
        return Ok(preset);
    }
    if Path::new(arg).is_file() {
        return ScenarioConfig::load(arg).with_context(|| format!("loading scenario {arg}"));
    }
    bail!(
        "'{arg}' is neither a preset (soldier_conveyor, frozen, grid, drift, drift_recolor) nor a file"
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_scenario(args.first().map(String::as_str))?;
    let seconds: f32 = match args.get(1) {
        Some(s) => s.parse().with_context(|| format!("invalid duration '{s}'"))?,
        None => 6.0,
    };

    log::info!(
        "Scenario '{}': {} entities, seed {}, {} events",
        config.name,
        config.count,
        config.seed,
        config.events.len()
    );

    let mut storage = RigStorage::new();
    let handle: RigHandle = match args.get(2) {
        Some(manifest) => {
            let path = Path::new(manifest);
            let file = path
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("invalid rig manifest path '{manifest}'"))?;
            storage.load(&ManifestLoader::new(path), file).await
        }
        None => storage.load(&soldier_loader(), SOLDIER_URL).await,
    };
    let template = storage.get(handle).context("rig failed to load")?;

    let mut sim = Simulation::from_config(&config)?;
    for entity in 0..sim.len() {
        sim.attach_rig(entity, &template)?;
    }

    let frames = (seconds / FRAME_DT).round() as u64;
    let period = (ROLE_PERIOD / FRAME_DT).round() as u64;
    let mut uploads = 0_u64;
    let mut uploaded_bytes = 0_usize;

    for frame in 1..=frames {
        if frame % period == 0 {
            let role = AnimationRole::ALL[((frame / period) % 3) as usize];
            for entity in 0..sim.len() {
                sim.set_active_role(entity, role)?;
            }
            log::info!("t={:.2}s switching to {role}", sim.elapsed());
        }

        sim.tick(FRAME_DT);

        if sim.consume_dirty() {
            uploads += 1;
            uploaded_bytes += sim.buffer().as_bytes().len();
        }
        if sim.buffer_mut().consume_colors_dirty() {
            log::info!("t={:.2}s colors changed", sim.elapsed());
        }
    }

    let lead = sim.entity(0)?;
    let pose = sim.pose(0)?;
    log::info!(
        "Ran {} frames ({:.2}s): {} uploads, {} bytes",
        sim.frame_count(),
        sim.elapsed(),
        uploads,
        uploaded_bytes
    );
    log::info!(
        "Entity 0 at {:?}, color {:?}, visible {}, dominant clip {}",
        lead.position,
        sim.color(0)?,
        lead.visible,
        pose.dominant().map_or("<static>", |s| s.clip.name.as_str())
    );
    Ok(())
}
