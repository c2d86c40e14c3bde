//! Headless museum simulation
//!
//! Runs the navigation core at a fixed tick rate without a renderer, logging
//! agent status as it goes.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{debug, error, info};

use museum_shared::MoveKey;
use museum_sim::navigation::RetargetReason;
use museum_sim::{GameWorld, Scene, WorldEvent};

const DEFAULT_TICK_RATE: u32 = 60;

#[derive(Parser, Debug)]
#[command(name = "museum-sim", version, about = "Headless museum walkthrough simulation")]
struct Args {
    /// Scene JSON file (built-in museum when omitted or unreadable)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Frames per second
    #[arg(long, default_value_t = DEFAULT_TICK_RATE, value_parser = clap::value_parser!(u32).range(1..))]
    tick_rate: u32,

    /// Simulated seconds to run (until Ctrl-C when omitted)
    #[arg(long)]
    duration: Option<f64>,

    /// RNG seed for reproducible wandering
    #[arg(long)]
    seed: Option<u64>,

    /// Seconds between status lines
    #[arg(long, default_value_t = 5.0)]
    status_interval: f64,

    /// Feed the nominal tick length instead of measured wall-clock time
    #[arg(long)]
    fixed_step: bool,

    /// Hold the forward key for the whole run
    #[arg(long)]
    walk_forward: bool,

    /// Print final agent snapshots as JSON
    #[arg(long)]
    dump: bool,
}

/// Retarget tallies between status lines
#[derive(Debug, Default)]
struct FrameTally {
    arrived: u32,
    stuck: u32,
    blocked: u32,
    player_blocked: u32,
}

impl FrameTally {
    fn record(&mut self, event: &WorldEvent) {
        match event {
            WorldEvent::Retargeted { reason: RetargetReason::Arrived, .. } => self.arrived += 1,
            WorldEvent::Retargeted { reason: RetargetReason::Stuck, id } => {
                debug!("[WANDER] NPC {} got stuck", id);
                self.stuck += 1;
            }
            WorldEvent::Retargeted { reason: RetargetReason::Blocked, .. } => self.blocked += 1,
            WorldEvent::Retargeted { .. } => {}
            WorldEvent::PlayerBlocked => self.player_blocked += 1,
        }
    }
}

fn log_status(world: &GameWorld, tally: &FrameTally) {
    info!(
        "[STATUS] frame {} t={:.1}s: {} arrivals, {} stuck, {} blocked, player blocked {} times",
        world.frame(),
        world.elapsed(),
        tally.arrived,
        tally.stuck,
        tally.blocked,
        tally.player_blocked
    );
    for snapshot in world.snapshots() {
        let [x, y, z] = snapshot.position;
        info!(
            "[STATUS]   {} ({:?}) at ({:.2}, {:.2}, {:.2}){}",
            snapshot.name,
            snapshot.kind,
            x,
            y,
            z,
            if snapshot.is_stuck { " STUCK" } else { "" }
        );
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    info!("Starting museum simulation...");
    info!("Tick rate: {} Hz", args.tick_rate);

    let scene = Scene::load_or_museum(args.scene.as_deref());
    let mut world = GameWorld::new(scene, args.seed);

    if args.walk_forward {
        if let Some(player) = world.player_mut() {
            player.input.key_down(MoveKey::Forward);
        }
    }

    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(args.tick_rate));
    let mut last_tick = Instant::now();
    let mut last_status = 0.0;
    let mut tally = FrameTally::default();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut listening = true;

    // Main loop
    loop {
        let tick_start = Instant::now();

        let delta = if args.fixed_step {
            tick_duration.as_secs_f32()
        } else {
            last_tick.elapsed().as_secs_f32()
        };
        last_tick = Instant::now();

        for event in world.update(delta) {
            tally.record(&event);
        }

        if world.elapsed() - last_status >= args.status_interval {
            log_status(&world, &tally);
            tally = FrameTally::default();
            last_status = world.elapsed();
        }

        if args.duration.is_some_and(|limit| world.elapsed() >= limit) {
            info!("Reached {:.1}s of simulated time", world.elapsed());
            break;
        }

        // Sleep until next tick
        let remaining = tick_duration.saturating_sub(tick_start.elapsed());
        tokio::select! {
            _ = tokio::time::sleep(remaining) => {}
            result = &mut shutdown, if listening => {
                match result {
                    Ok(()) => {
                        info!("Interrupted, stopping");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to listen for Ctrl-C: {}", e);
                        listening = false;
                    }
                }
            }
        }
    }

    log_status(&world, &tally);

    if args.dump {
        match serde_json::to_string_pretty(&world.snapshots()) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize snapshots: {}", e),
        }
    }
}
