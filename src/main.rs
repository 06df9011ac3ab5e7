//! proxemics-sim — headless synthetic-session driver.
//!
//! Stands in for the external rendering loop: scripts a viewer walking up
//! to a target, glancing away, and reaching for it with one hand, feeds
//! every frame to the analyzer, and emits snapshots and events for
//! inspection.

use clap::Parser;
use tracing::{debug, info};

use xr_proxemics::{InteractionAnalyzer, PoseSample, Quat, Target, Vec3};

#[derive(Parser, Debug)]
#[command(name = "proxemics-sim", about = "Synthetic XR interaction session")]
struct Cli {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 720)]
    frames: u32,

    /// Frame rate of the simulated session in Hz
    #[arg(long, default_value_t = 72.0)]
    rate_hz: f64,

    /// Print every snapshot as an s-expression to stdout
    #[arg(long)]
    sexp: bool,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("proxemics-sim {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xr_proxemics=info,proxemics_sim=info".into()),
        )
        .init();

    anyhow::ensure!(cli.rate_hz > 0.0, "--rate-hz must be positive");

    info!(
        frames = cli.frames,
        rate_hz = cli.rate_hz,
        "starting synthetic session"
    );

    let mut analyzer = InteractionAnalyzer::new();
    let target = Target::new(1, Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.9, 0.0));
    let targets = [target];
    let frame_ms = 1000.0 / cli.rate_hz;

    for frame in 0..cli.frames {
        let t_ms = frame as f64 * frame_ms;
        let t_s = t_ms / 1000.0;

        let viewer = scripted_viewer(t_s, t_ms, &target);
        let right = scripted_right_hand(t_s, t_ms, &viewer, &target);

        let snapshot = analyzer.update(t_ms, &viewer, None, Some(&right), &targets);

        if cli.sexp {
            println!("{}", snapshot.status_sexp());
        } else {
            debug!(
                t_s,
                gaze = ?snapshot.gaze_target,
                proximity = ?snapshot.proximity_tier,
                approach = ?snapshot.approach_speed,
                "frame"
            );
        }

        for event in analyzer.drain_events() {
            if cli.sexp {
                println!("{}", event.to_sexp());
            } else {
                info!("{}", event.to_sexp());
            }
        }
    }

    info!(status = %analyzer.status_sexp(), "session finished");
    Ok(())
}

/// Viewer walks from 4 units out to 1.5 units short of the target, then
/// stands; between 4s and 6s it yaws 90 degrees away.
fn scripted_viewer(t_s: f64, t_ms: f64, target: &Target) -> PoseSample {
    let walk_speed = 1.2;
    let stop_z = target.position.z + 1.5;
    let z = (4.0 - walk_speed * t_s).max(stop_z);
    let position = Vec3::new(0.0, 1.6, z);

    let orientation = if (4.0..6.0).contains(&t_s) {
        Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), std::f64::consts::FRAC_PI_2)
    } else {
        Quat::IDENTITY
    };

    PoseSample::new(position, orientation, t_ms)
}

/// Right hand rides at the viewer's side; once the viewer has settled it
/// darts to the target's base position and back on a 2-second cycle.
fn scripted_right_hand(t_s: f64, t_ms: f64, viewer: &PoseSample, target: &Target) -> PoseSample {
    let rest = viewer.position + Vec3::new(0.25, -0.5, -0.3);

    let phase = if t_s >= 6.5 {
        let cycle = (t_s - 6.5) % 2.0;
        // Triangle wave: out over the first second, back over the next.
        if cycle < 1.0 {
            cycle
        } else {
            2.0 - cycle
        }
    } else {
        0.0
    };

    let position = Vec3::new(
        rest.x + (target.position.x - rest.x) * phase,
        rest.y + (target.position.y - rest.y) * phase,
        rest.z + (target.position.z - rest.z) * phase,
    );
    PoseSample::new(position, viewer.orientation, t_ms)
}
