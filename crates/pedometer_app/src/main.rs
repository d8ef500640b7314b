use std::sync::Arc;

use anyhow::Context;
use pedometer_app::console::{print_views, read_commands};
use pedometer_app::session::{SessionTiming, run_session};
use pedometer_app::sources::step_source_from_config;
use pedometer_app::{LogNotifier, PedometerApp, UserAction, logging};
use pedometer_core::config::Config;
use pedometer_core::{LocalClock, Store, TrackerError};
use tokio::sync::{mpsc, watch};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `PEDOMETER_LOG_LEVEL`, then `RUST_LOG`, then `info`. Logs go to stderr.
    let directive = logging::init();
    tracing::info!("pedometer: log filter: {}", directive);

    let config = Config::from_env().context("invalid configuration")?;
    let store = match Store::load(config.data_file.clone(), Arc::new(LocalClock)) {
        Ok(store) => store,
        Err(e @ TrackerError::StateCorrupt { .. }) => {
            tracing::error!(error = %e, "pedometer: state file is unreadable; leaving it untouched");
            return Err(e.into());
        }
        Err(e) => return Err(e).context("failed to load state"),
    };
    tracing::info!(
        "pedometer: loaded {} ({} archived days)",
        store.path().display(),
        store.history().len()
    );

    let source = step_source_from_config(&config)?;
    let timing = SessionTiming::for_source(config.source);
    let app = PedometerApp::new(store, source, LogNotifier);

    let (action_tx, action_rx) = mpsc::channel(32);
    let (view_tx, view_rx) = watch::channel(app.current_view());

    // Ctrl-C holds only a weak handle so end of input still closes the session.
    let interrupt = action_tx.downgrade();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if let Some(tx) = interrupt.upgrade() {
                let _ = tx.send(UserAction::Quit).await;
            }
        }
    });
    std::thread::spawn(move || read_commands(std::io::stdin().lock(), action_tx));
    let printer = tokio::spawn(print_views(tokio::io::stdout(), view_rx));

    let app = run_session(app, action_rx, view_tx, timing).await;
    printer.await.context("view printer panicked")??;

    tracing::info!(
        "pedometer: exiting with {} steps recorded today",
        app.store().today().steps
    );
    Ok(())
}
