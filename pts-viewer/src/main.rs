/// PTS Viewer - interactive terminal view of a PTS point file
///
/// Position points are drawn as red spheres, oriented points as green
/// spheres with a red direction line.
/// Controls:
///   - WASD / Arrow Keys: Orbit the camera
///   - +/-: Zoom
///   - R: Reset the camera to frame all points
///   - Q/ESC: Quit
use anyhow::Context;
use clap::Parser;
use pts_core::{build_scene, parse_file, run_until_closed, CancelToken, ViewerConfig};
use pts_viewer::{cli::Cli, logging, TerminalViewer};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::enable_tracing(cli.verbose);

    let outcome =
        parse_file(&cli.pts_file).with_context(|| format!("could not load {}", cli.pts_file.display()))?;

    let config = ViewerConfig::default();
    let mut viewer = TerminalViewer::open().context("could not start the terminal viewer")?;
    viewer.set_status(format!(
        "{} position / {} oriented / {} rejected",
        outcome.points.positions.len(),
        outcome.points.oriented.len(),
        outcome.rejected.len()
    ));

    build_scene(&outcome.points, &config, &mut viewer)?;
    let frames = run_until_closed(&mut viewer, config.poll_interval, &CancelToken::new())?;

    // Restore the terminal before logging again
    drop(viewer);
    tracing::info!(frames, "viewer closed");
    Ok(())
}
