use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fetch_control::{
    ActionReport, ActorConfig, ActorSignal, CarryState, Controller, Frame, HeadlessAnimator,
    RecordingAudio,
};
use fetch_input::{CameraBasis, KeyBindings};
use fetch_kernel::{LevelDescription, TriggerEvent, TriggerTracker};
use glam::{Quat, Vec3};
use tracing_subscriber::EnvFilter;

const MEADOW: &str = include_str!("../levels/meadow.json");

#[derive(Parser)]
#[command(name = "fetch-cli", about = "Drive the fetch actor controller headlessly")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default tuning
    Info,
    /// Load and validate a level file
    Check {
        /// Level JSON file
        level: PathBuf,
    },
    /// Play a key script against a level
    Play {
        /// Level JSON file; the built-in meadow level when omitted
        #[arg(short, long)]
        level: Option<PathBuf>,
        /// Actor tuning JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Keys pressed one per frame (w/a/s/d, arrows, q/e, space)
        #[arg(short, long, default_value = "space w w w w")]
        script: String,
        /// Camera yaw in degrees; movement keys are relative to it
        #[arg(long, default_value = "0")]
        camera_yaw: f32,
        /// Simulation frames per second
        #[arg(long, default_value = "8")]
        fps: u32,
        /// Stop after this much simulated time
        #[arg(long, default_value = "60")]
        max_seconds: f32,
    },
}

struct PlayOptions {
    level_json: String,
    config: ActorConfig,
    script: String,
    camera: CameraBasis,
    dt: f32,
    max_frames: u64,
}

struct PlaySummary {
    level: String,
    frames: u64,
    position: Vec3,
    yaw_degrees: f32,
    carry_state: CarryState,
    completed: bool,
    reports: Vec<ActionReport>,
    cues: Vec<String>,
    /// Scene mutations drained from the world over the run.
    scene_events: usize,
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn play(options: PlayOptions) -> anyhow::Result<PlaySummary> {
    let level = LevelDescription::from_json_str(&options.level_json)?.load()?;
    let mut world = level.world;
    let commands = KeyBindings::default().parse_script(&options.script)?;

    let (tx, rx) = mpsc::channel();
    let step_degrees = options.config.rotation_step_degrees;
    let mut animator = HeadlessAnimator::for_clips(&options.config.clips);
    let mut audio = RecordingAudio::new();
    let mut controller = Controller::new(level.actor_start, options.config, tx)?;
    let mut triggers = TriggerTracker::new();
    let mut keys = commands.into_iter();
    let mut reports = Vec::new();
    let mut completed = false;
    let mut frames = 0;
    let mut scene_events = 0;

    controller.start(&mut animator);
    while frames < options.max_frames {
        let key = keys.next();
        if let Some(command) = key {
            match command.resolve(&options.camera, step_degrees) {
                Some(action) => controller.enqueue(action),
                None => tracing::warn!(?command, "key ignored"),
            }
        }

        let mut frame = Frame {
            dt: options.dt,
            scene: &mut world,
            animator: &mut animator,
            audio: &mut audio,
        };
        controller.update(&mut frame);
        frames += 1;

        for event in triggers.update(&world, controller.actor().position()) {
            if let TriggerEvent::Entered { class, .. } = event {
                controller.trigger_entered(class, &mut audio);
            }
        }
        reports.extend(controller.drain_reports());
        scene_events += world.drain_events().len();
        if rx.try_recv() == Ok(ActorSignal::LevelCompleted) {
            completed = true;
            break;
        }
        if key.is_none() && !controller.is_busy() && !controller.goal().is_counting_down() {
            break;
        }
    }

    let actor = controller.actor();
    let (yaw, _, _) = actor.rotation().to_euler(glam::EulerRot::YXZ);
    Ok(PlaySummary {
        level: level.name,
        frames,
        position: actor.position(),
        yaw_degrees: yaw.to_degrees(),
        carry_state: actor.carry_state(),
        completed,
        reports,
        cues: audio.cues().to_vec(),
        scene_events,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("fetch-cli v{}", env!("CARGO_PKG_VERSION"));
            for info in [
                fetch_kernel::crate_info(),
                fetch_input::crate_info(),
                fetch_control::crate_info(),
            ] {
                println!("  {info}");
            }
            let config = ActorConfig::default();
            println!(
                "move: {} m in {} s, turn: {} deg in {} s",
                config.move_distance,
                config.move_duration,
                config.rotation_step_degrees,
                config.rotate_duration
            );
            println!(
                "pickup: radius {} m, grace {} s, gate {} deg",
                config.pickup_radius, config.pickup_grace, config.orientation_gate_degrees
            );
        }
        Commands::Check { level } => {
            let loaded = LevelDescription::from_json_str(&read(&level)?)?.load()?;
            println!(
                "level '{}': {} entities, actor at {:?}",
                loaded.name,
                loaded.world.entity_count(),
                loaded.actor_start.position
            );
        }
        Commands::Play {
            level,
            config,
            script,
            camera_yaw,
            fps,
            max_seconds,
        } => {
            anyhow::ensure!(fps > 0, "fps must be positive");
            let level_json = match level {
                Some(path) => read(&path)?,
                None => MEADOW.to_owned(),
            };
            let config = match config {
                Some(path) => ActorConfig::from_json_str(&read(&path)?)?,
                None => ActorConfig::default(),
            };
            let camera = CameraBasis::from_forward(
                Quat::from_rotation_y(camera_yaw.to_radians()) * Vec3::NEG_Z,
            );
            let summary = play(PlayOptions {
                level_json,
                config,
                script,
                camera,
                dt: 1.0 / fps as f32,
                max_frames: (max_seconds.max(0.0) * fps as f32).ceil() as u64,
            })?;

            println!("level '{}' after {} frames", summary.level, summary.frames);
            for r in &summary.reports {
                println!(
                    "  #{:<3} {:<13} {:?} ({} frames)",
                    r.seq,
                    r.action.kind(),
                    r.outcome,
                    r.frames
                );
            }
            let p = summary.position;
            println!(
                "actor: pos=({:.2}, {:.2}, {:.2}) yaw={:.0} carry={:?}",
                p.x, p.y, p.z, summary.yaw_degrees, summary.carry_state
            );
            println!("cues: {:?}", summary.cues);
            println!("scene events: {}", summary.scene_events);
            println!(
                "level completed: {}",
                if summary.completed { "yes" } else { "no" }
            );
        }
    }

    Ok(())
}
