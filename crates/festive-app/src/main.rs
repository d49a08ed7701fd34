use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use festive_core::{EffectSession, EffectsConfig, GameOutcome};
use festive_platform::{ParticleRenderer, Result, ScriptedOutcomes, SurfaceRect, TickSource};

mod driver;
mod render;
mod ticker;

use crate::driver::run_outcomes;
use crate::render::{JsonLinesRenderer, LogRenderer};
use crate::ticker::{HeadlessTicker, RealtimeTicker};

struct Args {
    score: i64,
    record: bool,
    config: Option<PathBuf>,
    width: u32,
    height: u32,
    json: bool,
    realtime: bool,
    max_frames: Option<u64>,
}

impl Args {
    fn parse(args: &[String]) -> Self {
        Self {
            score: parse_arg(args, "--score").unwrap_or(36),
            record: args.iter().any(|a| a == "--record"),
            config: parse_arg::<String>(args, "--config").map(PathBuf::from),
            width: parse_arg(args, "--width").unwrap_or(390),
            height: parse_arg(args, "--height").unwrap_or(844),
            json: args.iter().any(|a| a == "--json"),
            realtime: args.iter().any(|a| a == "--realtime"),
            max_frames: parse_arg(args, "--frames"),
        }
    }
}

fn main() {
    // Init logging; JSON output owns stdout, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Festive starting");
    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run_app(Args::parse(&args)) {
        eprintln!("Festive error: {e}");
    }
}

fn run_app(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EffectsConfig::load(path)?,
        None => EffectsConfig::default(),
    };
    let surface = SurfaceRect {
        width: args.width,
        height: args.height,
    };
    let frame_dt = config.session.fixed_dt();
    let mut session = EffectSession::from_config(&config);
    let mut outcomes = ScriptedOutcomes::new([GameOutcome {
        score: args.score,
        is_new_record: args.record,
    }]);
    let mut ticker: Box<dyn TickSource> = if args.realtime {
        Box::new(RealtimeTicker::new(frame_dt))
    } else {
        match args.max_frames {
            Some(frames) => Box::new(HeadlessTicker::limited(frame_dt, frames)),
            None => Box::new(HeadlessTicker::new(frame_dt)),
        }
    };
    let mut renderer: Box<dyn ParticleRenderer> = if args.json {
        Box::new(JsonLinesRenderer::new(std::io::stdout().lock()))
    } else {
        Box::new(LogRenderer::new(30))
    };

    let summary = run_outcomes(
        &mut session,
        &mut outcomes,
        ticker.as_mut(),
        renderer.as_mut(),
        surface,
    )?;
    info!(
        effects = summary.effects_played,
        skipped = summary.outcomes_skipped,
        frames = summary.frames,
        peak = summary.peak_particles,
        "Festive finished"
    );
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], key: &str) -> Option<T> {
    args.windows(2)
        .find(|pair| pair[0] == key)
        .and_then(|pair| pair[1].parse().ok())
}
