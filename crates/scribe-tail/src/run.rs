//! Main loop for the log summarizer
//!
//! One task waits on whichever comes first: Ctrl-C, a change notification,
//! the moment pending lines become due, or a slow fallback tick for
//! filesystems that drop change events. Ctrl-C also wins over a summary
//! request that is still in flight.

use scribe_agent::TextGenerator;
use scribe_core::Result;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::monitor::LogMonitor;
use crate::tail::LogTail;
use crate::terminal;
use crate::ui::{self, StatusPanel};
use crate::watch::FileWatcher;

/// Re-read the file at least this often even without change events
pub const FALLBACK_TICK: Duration = Duration::from_secs(1);

/// Lines reserved for the panel, borders included
const PANEL_HEIGHT: u16 = 6;

/// Settings for one `tailpal` session
#[derive(Debug, Clone)]
pub struct TailOptions {
    pub path: PathBuf,
    pub interval: Duration,
    pub persona: String,
}

/// Follow `options.path` in a live panel until Ctrl-C
pub async fn run<G: TextGenerator>(generator: &G, options: TailOptions) -> Result<()> {
    let mut tail = LogTail::open(&options.path)?;
    let mut monitor = LogMonitor::new(options.persona.clone(), options.interval);

    let watcher = match FileWatcher::new(&options.path) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("{}, polling every {:?} instead", e, FALLBACK_TICK);
            None
        }
    };

    info!(
        "Monitoring {} every {}s as {}",
        options.path.display(),
        options.interval.as_secs(),
        options.persona
    );

    let mut terminal = terminal::init(PANEL_HEIGHT)?;
    let _guard = terminal::TerminalGuard::new();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let result = follow(
        generator,
        &mut tail,
        &mut monitor,
        watcher,
        |panel| {
            terminal
                .draw(|frame| ui::draw(frame, panel))
                .map(|_| ())
                .map_err(|e| scribe_core::ScribeError::Terminal(format!("Failed to draw: {}", e)))
        },
        shutdown,
    )
    .await;

    terminal::restore(&mut terminal)?;
    result
}

/// Tail, batch and render until `shutdown` completes
///
/// Pending lines at shutdown are dropped without a final summary.
pub async fn follow<G, F, S>(
    generator: &G,
    tail: &mut LogTail,
    monitor: &mut LogMonitor,
    mut watcher: Option<FileWatcher>,
    mut render: F,
    shutdown: S,
) -> Result<()>
where
    G: TextGenerator + ?Sized,
    F: FnMut(&StatusPanel) -> Result<()>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut panel = StatusPanel::new();
    render(&panel)?;

    let mut tick = tokio::time::interval(FALLBACK_TICK);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let deadline = monitor.next_deadline(Instant::now());
        let mut watcher_closed = false;

        tokio::select! {
            _ = &mut shutdown => break,
            event = changed(&mut watcher) => watcher_closed = event.is_none(),
            _ = tick.tick() => {}
            _ = sleep_until(deadline) => {}
        }

        if watcher_closed {
            warn!("File watcher stopped, polling every {:?}", FALLBACK_TICK);
            watcher = None;
        }

        let lines = tail.read_new_lines()?;
        if !lines.is_empty() {
            debug!("Read {} new lines from {}", lines.len(), tail.path().display());
            monitor.ingest(lines);
        }

        if !monitor.is_due(Instant::now()) {
            continue;
        }

        tokio::select! {
            _ = &mut shutdown => break,
            summary = monitor.summarize_if_due(generator, Instant::now()) => {
                if let Some(summary) = summary {
                    panel.show(summary);
                    render(&panel)?;
                }
            }
        }
    }

    info!("Stopped monitoring {}", tail.path().display());
    Ok(())
}

async fn changed(watcher: &mut Option<FileWatcher>) -> Option<()> {
    match watcher {
        Some(watcher) => watcher.changed().await,
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
