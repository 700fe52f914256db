use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use log::info;

use skyview::api::{FrameFormatter, FrameScheduler, IntervalScheduler, LimitedScheduler, OutputFormat, SkySession};
use skyview::ephemeris::{AstronomyEngine, BuiltinEngine};
use skyview::hardware::{GeoFix, MockCamera, MockGeolocation, MockOrientation, RecordingSurface};
use skyview::utils::{ConfigurationManager, SkyConfig};

/// Command line arguments for a headless overlay run
#[derive(Parser, Debug)]
#[command(author, version, about = "Render the sky overlay for a simulated device")]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Number of frames to render
    #[arg(short = 'n', long, default_value_t = 1)]
    frames: u64,

    /// Output format (text, json, csv)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// One line per frame in text output
    #[arg(long)]
    compact: bool,

    /// Horizontal field of view in degrees
    #[arg(long)]
    fov: Option<f64>,

    /// Comma-separated bodies to track, e.g. Moon,Mars,Vega
    #[arg(short, long, value_delimiter = ',')]
    bodies: Vec<String>,

    /// Observer latitude in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    lat: f64,

    /// Observer longitude in degrees
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    lon: f64,

    /// Observer elevation in meters
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    elevation: f64,

    /// Camera azimuth in degrees clockwise from north
    #[arg(long, default_value_t = 180.0)]
    azimuth: f64,

    /// Camera altitude above the horizon in degrees
    #[arg(long, default_value_t = 30.0, allow_hyphen_values = true)]
    altitude: f64,

    /// Video frame width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Video frame height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Start time (RFC 3339), defaults to now
    #[arg(short, long)]
    time: Option<DateTime<Utc>>,

    /// Random backdrop dots per frame
    #[arg(long)]
    backdrop_stars: Option<u32>,

    /// Pace frames in real time at the configured frame rate
    #[arg(long)]
    realtime: bool,

    /// Print the bodies the engine can place and exit
    #[arg(long)]
    list_bodies: bool,
}

fn load_config(args: &Args) -> Result<SkyConfig, Box<dyn std::error::Error>> {
    let mut manager = match &args.config {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };

    if let Some(fov) = args.fov {
        manager.set_horizontal_fov(fov)?;
    }
    if !args.bodies.is_empty() {
        let mut config = manager.config().clone();
        config.tracked_bodies = args.bodies.iter().map(|b| b.trim().to_string()).collect();
        manager.update_config(config)?;
    }
    if let Some(count) = args.backdrop_stars {
        manager.set_backdrop_stars(count);
    }

    Ok(manager.config().clone())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let engine = BuiltinEngine::new();
    if args.list_bodies {
        for body in engine.supported_bodies() {
            println!("{}", body);
        }
        return Ok(());
    }

    let config = load_config(&args)?;
    info!(
        "Tracking {} with a {}° field of view",
        config.tracked_bodies.join(", "),
        config.horizontal_fov_deg
    );

    let mut orientation = MockOrientation::new();
    orientation.push_pointing(args.azimuth, args.altitude);

    let mut session = SkySession::new(
        &config,
        MockCamera::new(args.width, args.height),
        MockGeolocation::with_fix(GeoFix::new(args.lat, args.lon).with_altitude(args.elevation)),
        orientation,
        RecordingSurface::default(),
        Box::new(engine),
    );
    session.register_event_callback(Box::new(|event| info!("{:?}", event)));
    session.start()?;

    let mut scheduler: Box<dyn FrameScheduler> = if args.realtime {
        Box::new(LimitedScheduler::new(IntervalScheduler::new(config.target_frame_rate_hz), args.frames))
    } else {
        Box::new(LimitedScheduler::immediate(args.frames))
    };

    let mut formatter = FrameFormatter::new(args.format);
    if args.compact {
        formatter = formatter.with_compact_text();
    }

    let start = args.time.unwrap_or_else(Utc::now);
    let frame_interval_ms = (1000.0 / config.target_frame_rate_hz).round() as i64;
    let mut frame_index: i64 = 0;

    while scheduler.wait_for_next_frame() {
        let time = start + Duration::milliseconds(frame_index * frame_interval_ms);
        let report = session.step_frame_at(time)?;
        println!("{}", formatter.format(&report)?);
        frame_index += 1;
    }

    session.stop();
    Ok(())
}
