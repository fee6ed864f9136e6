//! The session controller.
//!
//! [`Controller`] is the only owner of [`SessionState`]. Every mutation goes
//! through it, and every mutation is followed by a save. Two flags guard the
//! state:
//!
//! - `spinning` is set from [`Controller::begin_spin`] until
//!   [`Controller::end_spin`]; no second draw, import or reconfiguration can
//!   start while it is set.
//! - `resetting` is set by [`Controller::reset`] and never cleared. A reset
//!   controller refuses further work and writes nothing; open a new one from
//!   the same store to start over.

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SpinTiming;
use crate::engine::{CandidateReel, Pacing, draw_one};
use crate::error::{ConfigError, DrawError, PersistError};
use crate::ledger;
use crate::model::{Award, AwardConfig, Participant, SessionState};
use crate::persistence::Persistence;
use crate::pool::eligible_pool;
use crate::sequencer::next_available;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("failed to save session")]
    Store(#[from] PersistError),
}

impl SessionError {
    /// Guard conditions that turn a spin into a no-op.
    pub fn is_guard(&self) -> bool {
        matches!(self, SessionError::Draw(_))
    }
}

/// A draw that has passed its guards and is animating.
///
/// Holds its own copy of the pool for the reel; the winner is picked later,
/// in [`Controller::commit_spin`], from the pool as it is at that moment.
pub struct SpinPlan {
    pub award_index: usize,
    pub award_title: String,
    pub pacing: Pacing,
    pub reel: CandidateReel,
    epoch: u64,
}

pub struct Controller {
    state: SessionState,
    persistence: Persistence,
    rng: StdRng,
    spinning: bool,
    resetting: bool,
    epoch: u64,
}

impl Controller {
    /// Loads the saved session, or starts empty if there is none.
    pub fn open(persistence: Persistence) -> Result<Self, PersistError> {
        Self::with_rng(persistence, StdRng::from_entropy())
    }

    pub fn with_rng(persistence: Persistence, rng: StdRng) -> Result<Self, PersistError> {
        let state = persistence.load()?.unwrap_or_default();
        info!(
            participants = state.participants.len(),
            awards = state.awards.len(),
            current = state.current_award_index,
            "session opened"
        );
        Ok(Self {
            state,
            persistence,
            rng,
            spinning: false,
            resetting: false,
            epoch: 0,
        })
    }

    /// Tears this controller down and opens a fresh one on the same store.
    pub fn reopen(self) -> Result<Self, PersistError> {
        Self::open(self.persistence)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn pool(&self) -> Vec<&Participant> {
        eligible_pool(&self.state.participants, &self.state.awards)
    }

    pub fn current_award(&self) -> Option<&Award> {
        self.state.current_award()
    }

    pub fn needs_setup(&self) -> bool {
        self.state.needs_setup()
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Replaces the roster. Winners already recorded stay in the ledger.
    pub fn import_roster(&mut self, participants: Vec<Participant>) -> Result<usize, SessionError> {
        self.ensure_idle()?;
        let imported = participants.len();
        self.state.participants = participants;
        info!(imported, "roster replaced");
        self.persist()?;
        Ok(imported)
    }

    /// Applies a full award configuration. On rejection nothing changes.
    pub fn configure(&mut self, configs: Vec<AwardConfig>) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let merged = ledger::configure(&self.state.awards, configs)?;
        self.state.awards = merged;
        // With every tier complete the index stays put, clamped to the ledger.
        let last = self.state.awards.len().saturating_sub(1);
        self.state.current_award_index = next_available(&self.state.awards)
            .unwrap_or(self.state.current_award_index.min(last));
        info!(
            awards = self.state.awards.len(),
            current = self.state.current_award_index,
            "awards configured"
        );
        self.persist()?;
        Ok(())
    }

    /// Checks every guard, marks the session as spinning and prepares the reel.
    pub fn begin_spin(&mut self, timing: &SpinTiming) -> Result<SpinPlan, DrawError> {
        if self.resetting {
            return Err(DrawError::SessionReset);
        }
        if self.spinning {
            return Err(DrawError::DrawAlreadyInProgress);
        }
        let award_index = self.state.current_award_index;
        let award = self
            .state
            .awards
            .get(award_index)
            .ok_or(DrawError::NoCurrentAward)?;
        if award.is_complete() {
            return Err(DrawError::AwardAlreadyComplete {
                title: award.title.clone(),
            });
        }
        let pool = self.pool();
        if pool.is_empty() {
            return Err(DrawError::NoEligibleParticipants);
        }

        let pacing = Pacing::for_award(timing.cue, timing.frame, award.count);
        let plan = SpinPlan {
            award_index,
            award_title: award.title.clone(),
            pacing,
            reel: CandidateReel::new(&pool, pacing.frames()),
            epoch: self.epoch,
        };
        debug!(award = %plan.award_title, pool = pool.len(), "spin started");
        self.spinning = true;
        Ok(plan)
    }

    /// Picks the winner for a plan from [`Controller::begin_spin`], records it
    /// and advances the current award. The session stays marked as spinning
    /// until [`Controller::end_spin`].
    pub fn commit_spin(&mut self, plan: SpinPlan) -> Result<Participant, SessionError> {
        if plan.epoch != self.epoch || self.resetting {
            return Err(DrawError::SessionReset.into());
        }

        let pool = eligible_pool(&self.state.participants, &self.state.awards);
        let Some(award) = self.state.awards.get_mut(plan.award_index) else {
            self.spinning = false;
            return Err(DrawError::NoCurrentAward.into());
        };
        let winner = match draw_one(&pool, award, &mut self.rng) {
            Ok(winner) => winner,
            Err(err) => {
                self.spinning = false;
                return Err(err.into());
            }
        };
        info!(
            award = %award.title,
            winner = %winner.name,
            id = %winner.id,
            drawn = award.winners.len(),
            quota = award.count,
            "winner drawn"
        );

        if let Some(next) = next_available(&self.state.awards) {
            if next != self.state.current_award_index {
                info!(from = self.state.current_award_index, to = next, "advancing to next award");
            }
            self.state.current_award_index = next;
        }
        self.persist()?;
        Ok(winner)
    }

    /// Clears the spinning flag once the winner has been shown.
    pub fn end_spin(&mut self) {
        self.spinning = false;
    }

    /// Wipes the session and every persisted key, the auth flag included.
    ///
    /// Any draw in flight is abandoned: its commit fails with
    /// [`DrawError::SessionReset`] and writes nothing.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.resetting = true;
        self.spinning = false;
        self.epoch += 1;
        self.state = SessionState::default();
        self.persistence.clear()?;
        info!("session reset");
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), DrawError> {
        if self.resetting {
            return Err(DrawError::SessionReset);
        }
        if self.spinning {
            return Err(DrawError::DrawAlreadyInProgress);
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), PersistError> {
        if self.resetting {
            return Ok(());
        }
        // An empty session is stored as no snapshot at all.
        if self.state.is_empty() {
            return self.persistence.discard();
        }
        self.persistence.save(&self.state)
    }
}
