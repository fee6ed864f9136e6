//! Runs one spin end to end on the async runtime.
//!
//! The reel advances on a fixed interval for the reveal window, then the
//! winner is committed and held on screen before the session is released.
//! There is no cancellation: once started, a spin runs to its commit. A reset
//! in the meantime makes the commit fail instead.

use tokio::sync::Mutex;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::config::SpinTiming;
use crate::model::Participant;
use crate::session::{Controller, SessionError};

/// What the presentation layer is asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinFrame<'a> {
    Candidate(&'a Participant),
    Winner(&'a Participant),
}

/// Spins the current award once and returns its new winner.
///
/// The controller lock is only held to begin and to commit, so other tasks
/// can observe the session (and see it as spinning) during the reveal.
pub async fn spin<F>(
    controller: &Mutex<Controller>,
    timing: &SpinTiming,
    mut show: F,
) -> Result<Participant, SessionError>
where
    F: FnMut(SpinFrame<'_>),
{
    let mut plan = controller.lock().await.begin_spin(timing)?;
    let pacing = plan.pacing;
    debug!(
        award = %plan.award_title,
        frames = plan.reel.frames_left(),
        "reveal started"
    );

    let mut ticker = time::interval(pacing.frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    for candidate in plan.reel.by_ref() {
        ticker.tick().await;
        show(SpinFrame::Candidate(&candidate));
    }
    debug!(award = %plan.award_title, "reveal finished");

    let committed = controller.lock().await.commit_spin(plan);
    let winner = match committed {
        Ok(winner) => winner,
        Err(err) => {
            controller.lock().await.end_spin();
            return Err(err);
        }
    };
    show(SpinFrame::Winner(&winner));
    time::sleep(pacing.hold).await;
    controller.lock().await.end_spin();

    Ok(winner)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::error::DrawError;
    use crate::model::AwardConfig;
    use crate::persistence::{MemoryStore, Persistence};

    fn timing() -> SpinTiming {
        SpinTiming {
            cue: Duration::from_millis(1_000),
            frame: Duration::from_millis(80),
        }
    }

    fn ready_controller() -> Arc<Mutex<Controller>> {
        let persistence = Persistence::new(MemoryStore::new());
        let mut controller =
            Controller::with_rng(persistence, StdRng::seed_from_u64(11)).expect("open");
        controller
            .import_roster((1..=6).map(|i| Participant::new(i, format!("p{i}"))).collect())
            .expect("import");
        controller
            .configure(vec![AwardConfig {
                id: "gold".into(),
                title: "Gold".into(),
                count: 2,
            }])
            .expect("configure");
        Arc::new(Mutex::new(controller))
    }

    #[tokio::test(start_paused = true)]
    async fn spin_reveals_then_commits() {
        let controller = ready_controller();
        let mut candidates = 0;
        let mut shown_winner = None;

        let winner = spin(&controller, &timing(), |frame| match frame {
            SpinFrame::Candidate(_) => candidates += 1,
            SpinFrame::Winner(p) => shown_winner = Some(p.clone()),
        })
        .await
        .expect("spin");

        // 1000ms cue over a quota of 2: 400ms reveal at 80ms per frame.
        assert_eq!(candidates, 5);
        assert_eq!(shown_winner.as_ref(), Some(&winner));
        let guard = controller.lock().await;
        assert!(!guard.is_spinning());
        assert_eq!(guard.state().awards[0].winners, vec![winner]);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_frame_interval_still_spins() {
        let controller = ready_controller();
        let timing = SpinTiming {
            cue: Duration::from_millis(10),
            frame: Duration::ZERO,
        };
        let mut candidates = 0;

        spin(&controller, &timing, |frame| {
            if let SpinFrame::Candidate(_) = frame {
                candidates += 1;
            }
        })
        .await
        .expect("spin");

        // 10ms cue over a quota of 2: 4ms reveal at the 1ms floor.
        assert_eq!(candidates, 4);
        assert!(!controller.lock().await.is_spinning());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_spin_is_refused() {
        let controller = ready_controller();

        let first_timing = timing();
        let (first, second) = tokio::join!(
            spin(&controller, &first_timing, |_| {}),
            async {
                time::sleep(Duration::from_millis(100)).await;
                spin(&controller, &timing(), |_| {}).await
            }
        );

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(SessionError::Draw(DrawError::DrawAlreadyInProgress))
        ));
        assert_eq!(controller.lock().await.state().awards[0].winners.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_reveal_discards_the_draw() {
        let controller = ready_controller();

        let spin_timing = timing();
        let (outcome, ()) = tokio::join!(spin(&controller, &spin_timing, |_| {}), async {
            time::sleep(Duration::from_millis(150)).await;
            controller.lock().await.reset().expect("reset");
        });

        assert!(matches!(outcome, Err(SessionError::Draw(DrawError::SessionReset))));
        let guard = controller.lock().await;
        assert!(guard.state().is_empty());
        assert!(!guard.is_spinning());
    }
}
