//! Webcam Pulse Estimation CLI
//!
//! Command-line interface for testing and demonstrating the pulse
//! estimation pipeline against a synthetic camera.

use clap::Parser;
use pulse_cam::{
    Camera, CaptureConfig, CsvExporter, FileConfig, MockCamera, PulseProcessor, Rect,
    StaticDetector, UdpSink,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Webcam pulse detector demo.
#[derive(Debug, Parser)]
#[command(name = "pulse-cam", version)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to process (ignored with --continuous).
    #[arg(long)]
    frames: Option<u32>,

    /// Keep processing frames until interrupted.
    #[arg(long)]
    continuous: bool,

    /// UDP destination (host or host:port) for BPM readings.
    #[arg(long)]
    udp: Option<String>,

    /// Directory to export the raw series into when done.
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Webcam Pulse Estimator v{}", pulse_cam::VERSION);
    info!("This is a demonstration using mock camera input");

    let config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {e}");
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let mut camera = MockCamera::new();
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open camera: {e}");
        std::process::exit(1);
    }

    // The mock subject sits still, centered in the frame
    let face = centered_face(&config.capture);
    let detector = StaticDetector::new(vec![face]);
    let mut processor = match PulseProcessor::new(config.pulse.clone(), Box::new(detector)) {
        Ok(processor) => processor,
        Err(e) => {
            eprintln!("Invalid pipeline configuration: {e}");
            std::process::exit(1);
        }
    };

    let udp = args.udp.as_deref().map(|dest| match UdpSink::new(dest) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("Failed to set up UDP sink: {e}");
            std::process::exit(1);
        }
    });

    let continuous = args.continuous || config.output.continuous;
    let frame_count = args.frames.unwrap_or(config.output.frame_count);

    let running = Arc::new(AtomicBool::new(true));
    if continuous {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {e}");
        }
    }

    info!("Processing frames...");

    let mut processed = 0u64;
    while running.load(Ordering::SeqCst) && (continuous || processed < frame_count as u64) {
        let frame = match camera.capture() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Frame capture failed: {e}");
                continue;
            }
        };

        if let Err(e) = processor.run(&frame, 0) {
            eprintln!("Pipeline contract violated: {e}");
            std::process::exit(1);
        }
        processed += 1;

        if processed % 30 == 0 {
            match processor.bpm() {
                Some(bpm) => {
                    info!(frame = processed, "current estimate: {bpm:.1} bpm");
                    if let Some(sink) = &udp {
                        if let Err(e) = sink.send_bpm(bpm) {
                            warn!("UDP send failed: {e}");
                        }
                    }
                }
                None => info!(frame = processed, phase = ?processor.phase(), "warming up"),
            }
        }
    }

    camera.close();

    info!(
        "Processed {} frames, final phase {:?}",
        processed,
        processor.phase()
    );

    match processor.bpm() {
        Some(bpm) => println!("Estimated pulse: {bpm:.1} bpm"),
        None => println!("No stable pulse estimate (phase {:?})", processor.phase()),
    }

    if let Some(dir) = &args.csv {
        let exporter = CsvExporter::new(dir);
        match exporter.export(&processor.times(), &processor.intensities()) {
            Ok(path) => println!("Series written to {}", path.display()),
            Err(e) => warn!("CSV export failed: {e}"),
        }
    }
}

/// Places a plausible face box in the middle of the configured frame.
fn centered_face(capture: &CaptureConfig) -> Rect {
    let w = (capture.width / 3) as i32;
    let h = (capture.height / 2) as i32;
    Rect::new(
        (capture.width as i32 - w) / 2,
        (capture.height as i32 - h) / 2,
        w,
        h,
    )
}
