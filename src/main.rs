use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use kiss3d::window::Window;
use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use solar_orrery::file::read_file;
use solar_orrery::gui::Simulation;

#[derive(Debug, Parser)]
struct Args {
    /// Body table to load.
    #[arg(long, default_value = "solar-bodies.txt")]
    bodies: PathBuf,

    /// Seed for phase offsets and belt scatter. Random when omitted; pass the
    /// logged value to replay a layout.
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the clock paused.
    #[arg(long)]
    paused: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("scene seed is {}", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut composer = match read_file(&args.bodies, &mut rng) {
        Ok(composer) => composer,
        Err(e) => {
            error!("could not load scene: {}", e);
            exit(1);
        }
    };
    if args.paused {
        composer.clock_mut().pause();
    }

    let mut window = Window::new("Solar Orrery");
    window.set_framerate_limit(Some(60));

    let simulation = Simulation::new(composer, &mut window);
    window.render_loop(simulation);
}
