use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing_subscriber::{filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEBUG_DIRECTIVES: &[&str] = &["pts_core=debug", "pts_viewer=debug"];

static STDERR_PAUSES: AtomicUsize = AtomicUsize::new(0);

/// Install the stderr log subscriber.
///
/// `RUST_LOG` overrides the default `info` level; `debug` turns on debug
/// events for the workspace crates.
pub fn enable_tracing(debug: bool) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if debug {
        for directive in DEBUG_DIRECTIVES.iter().filter_map(|d| d.parse::<Directive>().ok()) {
            filter = filter.add_directive(directive);
        }
    }

    // A subscriber may already be installed by an embedding test harness
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(stderr_writer))
        .with(filter)
        .try_init();
}

fn stderr_writer() -> Box<dyn Write> {
    if stderr_paused() {
        Box::new(io::sink())
    } else {
        Box::new(io::stderr())
    }
}

/// Log events are discarded while this guard is alive
#[must_use]
pub struct StderrPause(());

impl Drop for StderrPause {
    fn drop(&mut self) {
        STDERR_PAUSES.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Stop writing log events to stderr until the returned guard is dropped.
///
/// Held by the terminal viewer while it owns the alternate screen.
pub fn pause_stderr() -> StderrPause {
    STDERR_PAUSES.fetch_add(1, Ordering::SeqCst);
    StderrPause(())
}

pub fn stderr_paused() -> bool {
    STDERR_PAUSES.load(Ordering::SeqCst) > 0
}
