//! Line-oriented front end: commands in, one JSON view per line out.

use std::io::BufRead;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::{AppResult, ScreenView, UserAction};

/// Forward parsed commands until input ends, `quit` is read or the session
/// stops listening. Unparseable lines are logged and skipped.
///
/// Blocks on `input`; run it on a dedicated thread, never on the runtime.
pub fn read_commands<R: BufRead>(input: R, actions: mpsc::Sender<UserAction>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to read command input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match UserAction::parse_command(&line) {
            Ok(action) => {
                let quit = action == UserAction::Quit;
                if actions.blocking_send(action).is_err() || quit {
                    break;
                }
            }
            Err(e) => warn!(error = %e, line = %line, "ignoring command"),
        }
    }
    debug!("command input closed");
}

/// Write every published view as a JSON line until the session drops its
/// sender.
pub async fn print_views<W>(mut out: W, mut views: watch::Receiver<ScreenView>) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let mut line = serde_json::to_string(&*views.borrow_and_update())?;
        line.push('\n');
        out.write_all(line.as_bytes()).await?;
        out.flush().await?;
        if views.changed().await.is_err() {
            break;
        }
    }
    Ok(())
}
