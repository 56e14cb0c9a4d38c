//! The timer state machine.
//!
//! Owns the [`Session`] and reacts to user intents, clock ticks, and cue
//! completions. Collaborators are injected so the machine runs against
//! fakes in tests instead of real timers and audio devices.

use tracing::{debug, info};

use crate::audio::{Cue, CueSink};
use crate::media::PlaybackController;
use crate::session::{
    FIVE_MINUTE_MARK, ONE_MINUTE_MARK, Phase, RunState, Session, SessionSnapshot,
};
use crate::ticker::TickSource;

use super::{EngineEvent, Intent};

/// Picks the phase entered when the current one completes.
///
/// Receives the finished phase and the completed-pomodoro count, so a
/// break cadence (short break after N, long break after M) can be plugged
/// in without touching the machine.
pub type NextPhasePolicy = Box<dyn Fn(Phase, u32) -> Phase + Send>;

/// Default policy: every completed phase is followed by another Pomodoro.
pub fn always_pomodoro(_finished: Phase, _completed: u32) -> Phase {
    Phase::Pomodoro
}

pub struct TimerEngine {
    session: Session,

    /// Bumped on Cancel and Reset. A pending cue completion carries the
    /// generation it was requested under; a mismatch means a stale
    /// completion that must not transition state.
    generation: u64,

    ticker: Box<dyn TickSource + Send>,
    cues: Box<dyn CueSink + Send>,

    /// External player kept in sync with the running state. Optional:
    /// absence never affects timer correctness.
    media: Option<Box<dyn PlaybackController + Send>>,

    next_phase: NextPhasePolicy,
}

impl TimerEngine {
    pub fn new(
        ticker: Box<dyn TickSource + Send>,
        cues: Box<dyn CueSink + Send>,
        media: Option<Box<dyn PlaybackController + Send>>,
    ) -> Self {
        Self {
            session: Session::new(),
            generation: 0,
            ticker,
            cues,
            media,
            next_phase: Box::new(always_pomodoro),
        }
    }

    /// Replace the phase-succession policy (defaults to [`always_pomodoro`]).
    pub fn with_next_phase(
        mut self,
        policy: impl Fn(Phase, u32) -> Phase + Send + 'static,
    ) -> Self {
        self.next_phase = Box::new(policy);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::of(&self.session)
    }

    /// Apply one event. Never fails: broken collaborators log and are
    /// otherwise ignored, so the timer stays operable regardless.
    pub fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Intent(Intent::Start) => self.start(),
            EngineEvent::Intent(Intent::Pause) => self.pause(),
            EngineEvent::Intent(Intent::Cancel) => self.cancel(),
            EngineEvent::Intent(Intent::Reset) => self.reset(),
            EngineEvent::Tick => self.tick(),
            EngineEvent::CueFinished { cue, generation } => {
                self.cue_finished(cue, generation);
            }
        }
    }

    fn start(&mut self) {
        if self.session.run_state != RunState::Idle {
            return;
        }
        if self.session.is_fresh() {
            // Fresh phase: pre-roll cue first, the clock starts when it ends.
            self.session.run_state = RunState::CountingDown;
            self.cues.play(Cue::StartingCountdown, self.generation);
            debug!("pre-roll started");
        } else {
            // Resuming a paused phase skips the pre-roll.
            self.begin_running();
        }
    }

    fn cue_finished(&mut self, cue: Cue, generation: u64) {
        if generation != self.generation {
            debug!(%cue, "stale cue completion ignored");
            return;
        }
        if cue == Cue::StartingCountdown && self.session.run_state == RunState::CountingDown {
            self.begin_running();
        }
    }

    fn begin_running(&mut self) {
        self.session.run_state = RunState::Running;
        self.ticker.arm();
        if let Some(media) = self.media.as_mut() {
            media.resume();
        }
        debug!(remaining = self.session.remaining_secs, "running");
    }

    fn pause(&mut self) {
        if self.session.run_state != RunState::Running {
            return;
        }
        self.ticker.disarm();
        self.session.run_state = RunState::Idle;
        if let Some(media) = self.media.as_mut() {
            media.pause();
        }
        debug!(remaining = self.session.remaining_secs, "paused");
    }

    fn cancel(&mut self) {
        if self.session.run_state != RunState::CountingDown {
            return;
        }
        // Invalidate the pending pre-roll completion before touching state.
        self.generation += 1;
        self.cues.stop();
        self.session.restore_fresh();
        debug!("pre-roll cancelled");
    }

    fn reset(&mut self) {
        if self.session.run_state == RunState::CountingDown || self.session.is_fresh() {
            return;
        }
        let was_running = self.session.run_state == RunState::Running;
        self.generation += 1;
        self.ticker.disarm();
        if was_running && let Some(media) = self.media.as_mut() {
            media.pause();
        }
        self.session.restore_fresh();
        debug!("session reset");
    }

    fn tick(&mut self) {
        if self.session.run_state != RunState::Running {
            return;
        }
        self.session.remaining_secs = self.session.remaining_secs.saturating_sub(1);
        let remaining = self.session.remaining_secs;

        // Threshold cues and phase end are separate checks, not an if/else
        // chain: they stay independent if the duration constants move.
        if self.session.phase == Phase::Pomodoro {
            if remaining == FIVE_MINUTE_MARK {
                self.cues.play(Cue::FiveMinutesRemaining, self.generation);
            } else if remaining == ONE_MINUTE_MARK {
                self.cues.play(Cue::OneMinuteRemaining, self.generation);
            }
        }

        if remaining == 0 {
            self.complete_phase();
        }
    }

    fn complete_phase(&mut self) {
        self.cues.play(Cue::TimeIsUp, self.generation);
        if self.session.phase == Phase::Pomodoro {
            self.session.completed_pomodoros += 1;
        }

        let next = (self.next_phase)(self.session.phase, self.session.completed_pomodoros);
        info!(
            completed = self.session.completed_pomodoros,
            next = %next,
            "phase complete"
        );

        self.session.phase = next;
        self.session.remaining_secs = next.duration_secs();
        self.ticker.disarm();
        self.session.run_state = RunState::Idle;
        if let Some(media) = self.media.as_mut() {
            media.pause();
        }
    }
}
