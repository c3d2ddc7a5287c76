//! Progress bar driver
//!
//! Renders a 20-segment textual bar for a bounded wait, advancing on a
//! fixed tick and finishing early if the VM's exit signal fires first.
//! The tick loop and the signal wait race inside one `select!`; whichever
//! arm wins renders the fully filled bar and returning tears the losing
//! path down, so exactly one full-bar render happens and no timer is left
//! orphaned.

use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::session::TerminalSession;

/// Number of bar segments.
const BAR_WIDTH: usize = 20;

/// Default tick interval for the animation.
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);

fn bar(filled: usize) -> String {
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Drive one progress bar on `session` until `timeout_ms` elapses or
/// `exit` fires.
///
/// A zero or negative timeout fills the bar on the first tick. Never
/// errors; an exit signal that already fired resolves immediately with a
/// full bar.
pub async fn run(
    session: &TerminalSession,
    exit: CancellationToken,
    timeout_ms: i64,
    tick: Duration,
) {
    let start = Instant::now();
    session.print(&bar(0), true);

    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = exit.cancelled() => {
                session.replace_last(&bar(BAR_WIDTH));
                debug!("progress finished: exit signal");
                return;
            }
            _ = ticker.tick() => {
                let elapsed = start.elapsed().as_millis() as i64;
                if timeout_ms <= 0 || elapsed > timeout_ms {
                    session.replace_last(&bar(BAR_WIDTH));
                    debug!(elapsed, timeout_ms, "progress finished: timeout");
                    return;
                }

                let fraction = (elapsed as f64 / timeout_ms as f64).min(1.0);
                let filled = (fraction * BAR_WIDTH as f64).floor() as usize;
                session.replace_last(&bar(filled));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::test_session;

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_fills_on_first_tick() {
        let (session, surface) = test_session(false);
        let exit = CancellationToken::new();

        run(&session, exit, 0, DEFAULT_TICK).await;

        assert_eq!(session.lines(), vec![bar(BAR_WIDTH)]);
        assert_eq!(surface.lines().last().unwrap(), &bar(BAR_WIDTH));
    }

    #[tokio::test(start_paused = true)]
    async fn negative_timeout_fills_on_first_tick() {
        let (session, _surface) = test_session(false);
        let exit = CancellationToken::new();

        run(&session, exit, -5, DEFAULT_TICK).await;

        assert_eq!(session.lines(), vec![bar(BAR_WIDTH)]);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_path_renders_full_bar() {
        let (session, _surface) = test_session(false);
        let exit = CancellationToken::new();

        run(&session, exit, 200, DEFAULT_TICK).await;

        assert_eq!(session.lines(), vec![bar(BAR_WIDTH)]);
    }

    #[tokio::test(start_paused = true)]
    async fn bar_advances_with_elapsed_time() {
        let (session, surface) = test_session(false);
        let exit = CancellationToken::new();

        let driver = {
            let session = session.clone();
            tokio::spawn(async move { run(&session, exit, 1_000, DEFAULT_TICK).await })
        };

        // Half the timeout: roughly half the bar should be filled.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let mid = surface.lines().last().unwrap().clone();
        let filled = mid.matches('#').count();
        assert!((9..=11).contains(&filled), "bar was {mid:?}");

        driver.await.unwrap();
        assert_eq!(session.lines(), vec![bar(BAR_WIDTH)]);
    }

    #[tokio::test(start_paused = true)]
    async fn exit_signal_wins_race_and_stops_ticking() {
        let (session, surface) = test_session(false);
        let exit = CancellationToken::new();

        let driver = {
            let session = session.clone();
            let exit = exit.clone();
            tokio::spawn(async move { run(&session, exit, 10_000, DEFAULT_TICK).await })
        };

        tokio::time::sleep(Duration::from_millis(5_000)).await;
        exit.cancel();
        driver.await.unwrap();

        assert_eq!(session.lines(), vec![bar(BAR_WIDTH)]);
        let rewrites_at_finish = surface.rewrite_count();

        // No further renders after the winning arm completed.
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(surface.rewrite_count(), rewrites_at_finish);
    }

    #[tokio::test(start_paused = true)]
    async fn already_fired_signal_resolves_immediately() {
        let (session, _surface) = test_session(false);
        let exit = CancellationToken::new();
        exit.cancel();

        run(&session, exit, i64::MAX, DEFAULT_TICK).await;

        assert_eq!(session.lines(), vec![bar(BAR_WIDTH)]);
    }

    #[test]
    fn bar_rendering() {
        assert_eq!(bar(0), "[--------------------]");
        assert_eq!(bar(20), "[####################]");
        assert_eq!(bar(7), "[#######-------------]");
        // Clamped, never wider than the bar.
        assert_eq!(bar(25), "[####################]");
    }
}
