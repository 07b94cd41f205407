//! Terminal event loop.
//!
//! One task, one thread: `select!` between the next input line and the
//! engine's next deadline. Engine time is the wall time elapsed since the
//! loop started.

use std::time::Duration;

use log::debug;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{self, Instant};

use crate::controller::{Flow, GameController};
use crate::error::Result;
use crate::game::{Presenter, SymbolPicker};
use crate::store::ScoreStore;

/// Drive `controller` from `input` until a quit command or end of input
pub async fn run<P, S, G, R>(controller: &mut GameController<P, S, G>, input: R) -> Result<()>
where
    P: Presenter,
    S: ScoreStore,
    G: SymbolPicker,
    R: AsyncBufRead + Unpin,
{
    let started = Instant::now();
    let mut lines = input.lines();

    loop {
        let deadline = controller.engine().next_deadline();

        tokio::select! {
            line = lines.next_line() => {
                controller.tick(started.elapsed());
                match line? {
                    Some(line) => {
                        if controller.handle_line(&line) == Flow::Quit {
                            debug!("[RUNTIME] Quit requested");
                            break;
                        }
                    }
                    None => {
                        debug!("[RUNTIME] End of input");
                        break;
                    }
                }
            }
            _ = sleep_until(started, deadline) => {
                controller.tick(started.elapsed());
            }
        }
    }

    Ok(())
}

async fn sleep_until(started: Instant, deadline: Option<Duration>) {
    match deadline {
        Some(deadline) => time::sleep_until(started + deadline).await,
        None => std::future::pending().await,
    }
}
