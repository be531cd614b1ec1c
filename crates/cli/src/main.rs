#![deny(unsafe_code)]
//! Headless CLI driver for the chladni simulator.
//!
//! Subcommands:
//! - `run` — simulate a scene for N steps, write a PNG snapshot
//! - `list` — print available scene presets

mod error;
mod pixel;
mod scene;
mod snapshot;

use chladni_core::geom::Rect;
use chladni_core::params::param_f64;
use chladni_core::Xorshift64;
use chladni_sand::SandField;
use chladni_wave::WaveField;
use clap::{Parser, Subcommand};
use error::CliError;
use glam::DVec2;
use scene::SceneSpec;
use std::path::PathBuf;
use std::process;

/// The plate authoring viewbox, matching the classic 500x500 plate.
const VIEWBOX_MIN: DVec2 = DVec2::new(-250.0, -250.0);
const VIEWBOX_MAX: DVec2 = DVec2::new(250.0, 250.0);

/// Default wave speed coefficient.
const DEFAULT_ALPHA: f64 = 10.0;

#[derive(Parser)]
#[command(name = "chladni", about = "Chladni plate simulator CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a scene for N steps and write a PNG snapshot.
    Run {
        /// Scene preset name (see `list`).
        #[arg(short, long, default_value = "classic")]
        scene: String,

        /// JSON scene file, overriding --scene.
        #[arg(long)]
        scene_file: Option<PathBuf>,

        /// Number of simulation steps.
        #[arg(short = 'n', long, default_value_t = 2000)]
        steps: usize,

        /// Fixed time step per tick.
        #[arg(long, default_value_t = 0.016)]
        dt: f64,

        /// Number of sand grains to scatter.
        #[arg(short, long, default_value_t = 400)]
        particles: usize,

        /// PRNG seed for grain scattering.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output file path.
        #[arg(short, long, default_value = "chladni.png")]
        output: PathBuf,

        /// Solver overrides as a JSON string, e.g. '{"alpha": 8, "frequency": 0.3}'.
        #[arg(long, default_value = "{}")]
        params: String,
    },
    /// List available scene presets.
    List,
}

fn load_scene(name: &str, file: Option<&PathBuf>) -> Result<SceneSpec, CliError> {
    match file {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).map_err(|e| CliError::Io(e.to_string()))?;
            serde_json::from_str(&text)
                .map_err(|e| CliError::Input(format!("invalid scene file: {e}")))
        }
        None => SceneSpec::from_name(name)
            .ok_or_else(|| CliError::Input(format!("unknown scene: {name}"))),
    }
}

/// Scatters `count` grains at seeded-random in-plate positions.
fn scatter_grains(sand: &mut SandField, wave: &WaveField, count: usize, seed: u64) -> usize {
    let viewbox = wave.viewbox();
    let mut rng = Xorshift64::new(seed);
    let mut placed = 0;
    let mut attempts = 0;
    // Rejection sampling against the mask; bail out on pathological scenes
    // where almost nothing is inside.
    while placed < count && attempts < count.saturating_mul(50).max(1000) {
        attempts += 1;
        let p = DVec2::new(
            rng.next_range(viewbox.min.x, viewbox.max.x),
            rng.next_range(viewbox.min.y, viewbox.max.y),
        );
        if wave.in_plate(p) {
            sand.add_particle(p, DVec2::ZERO);
            placed += 1;
        }
    }
    placed
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            if cli.json {
                let info = serde_json::json!({ "scenes": scene::SCENE_NAMES });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Scenes:");
                for name in scene::SCENE_NAMES {
                    println!("  {name}");
                }
            }
        }
        Command::Run {
            scene,
            scene_file,
            steps,
            dt,
            particles,
            seed,
            output,
            params,
        } => {
            let spec = load_scene(&scene, scene_file.as_ref())?;
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let alpha = param_f64(&params, "alpha", DEFAULT_ALPHA);

            let viewbox = Rect::new(VIEWBOX_MIN, VIEWBOX_MAX);
            let mut wave = WaveField::new(alpha, viewbox);
            wave.set_boundary(spec.boundary_ring());
            for src in &spec.sources {
                let freq = param_f64(&params, "frequency", src.freq);
                wave.add_source(DVec2::new(src.point[0], src.point[1]), freq, src.t0);
            }

            wave.begin(dt);
            if !wave.is_simulating() {
                return Err(CliError::Input(
                    "scene boundary does not enclose a plate".into(),
                ));
            }

            let view_pos = DVec2::new(viewbox.min.x, viewbox.max.y);
            let mut sand = SandField::new(view_pos, view_pos);
            sand.begin();
            let placed = scatter_grains(&mut sand, &wave, particles, seed);

            let mut t = 0.0;
            for _ in 0..steps {
                t += dt;
                wave.step(dt, t);
                sand.step(dt, &wave);
            }

            let view = wave
                .plate_view()
                .ok_or_else(|| CliError::Input("session ended unexpectedly".into()))?;
            let mut rgba = pixel::plate_to_rgba(&view);
            pixel::stamp_particles(&mut rgba, &view, sand.particles());
            snapshot::write_png(&rgba, view.width(), view.height(), &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "scene": scene_file
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or(scene),
                    "steps": steps,
                    "dt": dt,
                    "grains_placed": placed,
                    "grains_left": sand.len(),
                    "solver": wave.params(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "simulated {steps} steps (dt {dt}), {placed} grains scattered, {} left -> {}",
                    sand.len(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
