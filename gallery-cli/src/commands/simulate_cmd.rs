use std::path::PathBuf;

use glam::Vec3;
use gallery_shared::camera::ViewOrientation;
use gallery_shared::input::{KeyId, KeyPress};
use gallery_shared::movement::MoveOutcome;
use gallery_shared::{GalleryEvent, GalleryLayout, Walkthrough};
use serde::Serialize;

use crate::cli::ReportFormat;
use crate::project;

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub hold: Vec<String>,
    pub seconds: f32,
    pub fps: u32,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub interact: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    /// Seconds since the simulation started.
    pub time: f64,
    pub event: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub intro_frames: u32,
    pub roam_frames: u32,
    pub start: Vec3,
    pub end: Vec3,
    pub distance: f32,
    pub slid_frames: u32,
    pub blocked_frames: u32,
    pub target: Option<String>,
    pub events: Vec<SimEvent>,
}

pub async fn run(
    layout_path: PathBuf,
    options: SimOptions,
    format: ReportFormat,
) -> anyhow::Result<()> {
    let (layout, source) = project::resolve_layout(Some(&layout_path))?;
    log::info!("Simulating {}", source.label());
    let report = simulate(&layout, &options)?;

    match format {
        ReportFormat::Toml => print!("{}", toml::to_string_pretty(&report)?),
        ReportFormat::Text => print_text(&report),
    }
    Ok(())
}

/// Play the intro to completion, capture the pointer, then hold the given
/// keys for `seconds` of free roam.
pub fn simulate(layout: &GalleryLayout, options: &SimOptions) -> anyhow::Result<SimReport> {
    if options.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }
    if !(options.seconds.is_finite() && options.seconds >= 0.0) {
        anyhow::bail!("--seconds must be a non-negative number");
    }
    for key in &options.hold {
        if KeyId::from_key_name(key).is_none() {
            anyhow::bail!(
                "Unknown key: {key}. Options: w a s d W A S D ArrowUp ArrowDown ArrowLeft ArrowRight"
            );
        }
    }

    let dt = 1.0 / options.fps as f32;
    let mut walk = Walkthrough::new(layout);
    let mut events = Vec::new();

    // The dolly always reaches its end; the bound guards against rounding.
    let max_intro_frames = (layout.intro.duration * options.fps as f32).ceil() as u32 + 2;
    let mut intro_frames = 0;
    while walk.intro_progress() < 1.0 && intro_frames < max_intro_frames {
        record(&mut events, walk.elapsed(), walk.frame(dt));
        intro_frames += 1;
    }

    walk.set_locked(true);
    walk.set_view(ViewOrientation::new(
        options.yaw_degrees.to_radians(),
        options.pitch_degrees.to_radians(),
    ));
    for key in &options.hold {
        if let KeyPress::Pressed(id) = walk.key_down(key) {
            log::debug!("Holding {}", id.name());
        }
    }
    record(&mut events, walk.elapsed(), walk.take_events());

    let start = walk.position();
    let roam_frames = (options.seconds * options.fps as f32).round() as u32;
    let mut slid_frames = 0;
    let mut blocked_frames = 0;
    for _ in 0..roam_frames {
        let frame_events = walk.frame(dt);
        match walk.last_move() {
            Some(MoveOutcome::Slid { .. }) => slid_frames += 1,
            Some(MoveOutcome::Blocked { .. }) => blocked_frames += 1,
            _ => {}
        }
        record(&mut events, walk.elapsed(), frame_events);
    }

    if options.interact {
        walk.release_keys();
        // Settle the target from the final pose; with zero roam frames it
        // has never been computed.
        record(&mut events, walk.elapsed(), walk.frame(dt));
        walk.key_down(KeyId::LowerE.name());
        record(&mut events, walk.elapsed(), walk.take_events());
    }

    let end = walk.position();
    Ok(SimReport {
        intro_frames,
        roam_frames,
        start,
        end,
        distance: start.distance(end),
        slid_frames,
        blocked_frames,
        target: walk.target_name().map(str::to_string),
        events,
    })
}

fn record(out: &mut Vec<SimEvent>, time: f64, events: Vec<GalleryEvent>) {
    out.extend(events.into_iter().map(|e| SimEvent {
        time,
        event: describe(&e),
    }));
}

fn describe(event: &GalleryEvent) -> String {
    match event {
        GalleryEvent::IntroFinished => "intro finished".into(),
        GalleryEvent::PromptChanged(Some(text)) => format!("prompt: {text}"),
        GalleryEvent::PromptChanged(None) => "prompt hidden".into(),
        GalleryEvent::Download { href, filename } => format!("download {filename} ({href})"),
        GalleryEvent::Notice(message) => format!("notice: {message}"),
    }
}

fn print_text(report: &SimReport) {
    println!(
        "Intro: {} frames; free roam: {} frames",
        report.intro_frames, report.roam_frames
    );
    println!(
        "Start: ({:.3}, {:.3}, {:.3})",
        report.start.x, report.start.y, report.start.z
    );
    println!(
        "End:   ({:.3}, {:.3}, {:.3})  moved {:.3}",
        report.end.x, report.end.y, report.end.z, report.distance
    );
    println!(
        "Collisions: {} sliding, {} blocked",
        report.slid_frames, report.blocked_frames
    );
    println!("Target: {}", report.target.as_deref().unwrap_or("none"));
    if !report.events.is_empty() {
        println!();
        for e in &report.events {
            println!("[{:>6.3}s] {}", e.time, e.event);
        }
    }
}
