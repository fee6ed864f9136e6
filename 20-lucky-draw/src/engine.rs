//! Winner selection and the cosmetic candidate reel.
//!
//! The committed pick and the on-screen candidates never share a random source:
//! [`draw_one`] takes the session's generator, while [`CandidateReel`] owns a
//! private one and a copy of the pool. Nothing the reel shows can influence
//! who wins.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::DrawError;
use crate::model::{Award, Participant};

/// Picks one participant uniformly from `pool` and appends it to `award`.
pub fn draw_one<R: Rng + ?Sized>(
    pool: &[&Participant],
    award: &mut Award,
    rng: &mut R,
) -> Result<Participant, DrawError> {
    if award.is_complete() {
        return Err(DrawError::AwardAlreadyComplete {
            title: award.title.clone(),
        });
    }
    let winner = pool
        .choose(rng)
        .map(|participant| (*participant).clone())
        .ok_or(DrawError::NoEligibleParticipants)?;
    award.winners.push(winner.clone());
    Ok(winner)
}

/// Shortest reel frame; the reveal ticker cannot run on a zero period.
pub const MIN_FRAME: Duration = Duration::from_millis(1);

/// Timing of one spin.
///
/// The cue is split evenly across the award's quota; each spin reveals
/// candidates for 80% of its share and holds the winner for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub reveal: Duration,
    pub hold: Duration,
    pub frame: Duration,
}

impl Pacing {
    /// `frame` is raised to at least [`MIN_FRAME`].
    pub fn for_award(cue: Duration, frame: Duration, quota: u32) -> Self {
        let share = cue / quota.max(1);
        Self {
            reveal: share * 4 / 5,
            hold: share / 5,
            frame: frame.max(MIN_FRAME),
        }
    }

    /// Number of candidate frames shown before the commit.
    pub fn frames(&self) -> usize {
        let frame = self.frame.as_millis().max(1);
        self.reveal.as_millis().div_ceil(frame) as usize
    }
}

/// A finite stream of random candidates for the reveal animation.
///
/// Built once per spin; it cannot be rewound. Draws with replacement from its
/// own snapshot of the pool.
pub struct CandidateReel {
    candidates: Vec<Participant>,
    frames_left: usize,
    rng: StdRng,
}

impl CandidateReel {
    pub fn new(pool: &[&Participant], frames: usize) -> Self {
        Self {
            candidates: pool.iter().map(|participant| (*participant).clone()).collect(),
            frames_left: frames,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn frames_left(&self) -> usize {
        self.frames_left
    }
}

impl Iterator for CandidateReel {
    type Item = Participant;

    fn next(&mut self) -> Option<Participant> {
        if self.frames_left == 0 {
            return None;
        }
        self.frames_left -= 1;
        self.candidates.choose(&mut self.rng).cloned()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = if self.candidates.is_empty() {
            0
        } else {
            self.frames_left
        };
        (len, Some(len))
    }
}
