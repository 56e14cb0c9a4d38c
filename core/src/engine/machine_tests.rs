//! Tests for the timer state machine.
//!
//! All collaborators are fakes that record their call sequences; the
//! assertions drive the machine purely through [`EngineEvent`]s.

use std::sync::{Arc, Mutex};

use crate::audio::{Cue, CueSink};
use crate::media::PlaybackController;
use crate::session::{FIVE_MINUTE_MARK, ONE_MINUTE_MARK, POMODORO_SECS, Phase, RunState};
use crate::ticker::TickSource;

use super::{EngineEvent, Intent, TimerEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Arm,
    Disarm,
    Play(Cue),
    StopCue,
    Resume,
    PauseMedia,
}

#[derive(Clone, Default)]
struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, call: Call) -> usize {
        self.0.lock().unwrap().iter().filter(|&&c| c == call).count()
    }

    fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

/// Records every play with the generation it was requested under.
#[derive(Clone, Default)]
struct PlayLog(Arc<Mutex<Vec<(Cue, u64)>>>);

impl PlayLog {
    fn last(&self) -> (Cue, u64) {
        *self.0.lock().unwrap().last().expect("no cue was played")
    }
}

struct FakeTicker(CallLog);

impl TickSource for FakeTicker {
    fn arm(&mut self) {
        self.0.push(Call::Arm);
    }

    fn disarm(&mut self) {
        self.0.push(Call::Disarm);
    }
}

struct FakeCues {
    log: CallLog,
    plays: PlayLog,
}

impl CueSink for FakeCues {
    fn play(&mut self, cue: Cue, generation: u64) {
        self.log.push(Call::Play(cue));
        self.plays.0.lock().unwrap().push((cue, generation));
    }

    fn stop(&mut self) {
        self.log.push(Call::StopCue);
    }
}

struct FakeMedia(CallLog);

impl PlaybackController for FakeMedia {
    fn resume(&mut self) {
        self.0.push(Call::Resume);
    }

    fn pause(&mut self) {
        self.0.push(Call::PauseMedia);
    }
}

fn rig() -> (TimerEngine, CallLog, PlayLog) {
    let log = CallLog::default();
    let plays = PlayLog::default();
    let engine = TimerEngine::new(
        Box::new(FakeTicker(log.clone())),
        Box::new(FakeCues {
            log: log.clone(),
            plays: plays.clone(),
        }),
        Some(Box::new(FakeMedia(log.clone()))),
    );
    (engine, log, plays)
}

/// Start from fresh and complete the pre-roll cue.
fn start_running(engine: &mut TimerEngine, plays: &PlayLog) {
    engine.handle(EngineEvent::Intent(Intent::Start));
    let (cue, generation) = plays.last();
    assert_eq!(cue, Cue::StartingCountdown);
    engine.handle(EngineEvent::CueFinished { cue, generation });
}

fn tick_n(engine: &mut TimerEngine, n: u32) {
    for _ in 0..n {
        engine.handle(EngineEvent::Tick);
    }
}

#[test]
fn fresh_start_waits_for_preroll_completion() {
    let (mut engine, log, plays) = rig();

    engine.handle(EngineEvent::Intent(Intent::Start));
    assert_eq!(engine.session().run_state, RunState::CountingDown);
    assert_eq!(log.calls(), vec![Call::Play(Cue::StartingCountdown)]);

    // The clock must not decay during the pre-roll.
    engine.handle(EngineEvent::Tick);
    assert_eq!(engine.session().remaining_secs, POMODORO_SECS);

    let (cue, generation) = plays.last();
    engine.handle(EngineEvent::CueFinished { cue, generation });
    assert_eq!(engine.session().run_state, RunState::Running);
    assert_eq!(
        log.calls(),
        vec![Call::Play(Cue::StartingCountdown), Call::Arm, Call::Resume]
    );
}

#[test]
fn resume_from_pause_skips_preroll() {
    let (mut engine, log, plays) = rig();
    start_running(&mut engine, &plays);
    tick_n(&mut engine, POMODORO_SECS - 737);
    assert_eq!(engine.session().remaining_secs, 737);

    engine.handle(EngineEvent::Intent(Intent::Pause));
    assert_eq!(engine.session().run_state, RunState::Idle);
    assert_eq!(engine.session().remaining_secs, 737);

    log.clear();
    engine.handle(EngineEvent::Intent(Intent::Start));
    // Straight to Running: no second pre-roll cue.
    assert_eq!(engine.session().run_state, RunState::Running);
    assert_eq!(log.calls(), vec![Call::Arm, Call::Resume]);

    engine.handle(EngineEvent::Tick);
    assert_eq!(engine.session().remaining_secs, 736);
}

#[test]
fn full_pomodoro_fires_each_cue_exactly_once() {
    let (mut engine, log, plays) = rig();
    start_running(&mut engine, &plays);
    tick_n(&mut engine, POMODORO_SECS);

    assert_eq!(log.count(Call::Play(Cue::FiveMinutesRemaining)), 1);
    assert_eq!(log.count(Call::Play(Cue::OneMinuteRemaining)), 1);
    assert_eq!(log.count(Call::Play(Cue::TimeIsUp)), 1);

    let session = engine.session();
    assert_eq!(session.completed_pomodoros, 1);
    assert_eq!(session.run_state, RunState::Idle);
    assert_eq!(session.phase, Phase::Pomodoro);
    assert_eq!(session.remaining_secs, POMODORO_SECS);
    assert!(session.is_fresh());

    // Phase end stops the clock and pauses the external player.
    assert_eq!(log.count(Call::Disarm), 1);
    assert_eq!(log.count(Call::PauseMedia), 1);
}

#[test]
fn threshold_cues_fire_at_the_marks() {
    let (mut engine, log, plays) = rig();
    start_running(&mut engine, &plays);

    tick_n(&mut engine, POMODORO_SECS - FIVE_MINUTE_MARK - 1);
    assert_eq!(log.count(Call::Play(Cue::FiveMinutesRemaining)), 0);
    engine.handle(EngineEvent::Tick);
    assert_eq!(engine.session().remaining_secs, FIVE_MINUTE_MARK);
    assert_eq!(log.count(Call::Play(Cue::FiveMinutesRemaining)), 1);

    tick_n(&mut engine, FIVE_MINUTE_MARK - ONE_MINUTE_MARK - 1);
    assert_eq!(log.count(Call::Play(Cue::OneMinuteRemaining)), 0);
    engine.handle(EngineEvent::Tick);
    assert_eq!(engine.session().remaining_secs, ONE_MINUTE_MARK);
    assert_eq!(log.count(Call::Play(Cue::OneMinuteRemaining)), 1);
}

#[test]
fn cancel_during_preroll_restores_fresh_session() {
    let (mut engine, log, plays) = rig();
    engine.handle(EngineEvent::Intent(Intent::Start));
    let (cue, stale_generation) = plays.last();

    engine.handle(EngineEvent::Intent(Intent::Cancel));
    let session = engine.session();
    assert!(session.is_fresh());
    assert_eq!(session.phase, Phase::Pomodoro);
    assert_eq!(session.remaining_secs, POMODORO_SECS);
    assert_eq!(log.count(Call::StopCue), 1, "in-progress cue must be stopped");

    // A completion that was already in flight when Cancel ran must not
    // resurrect the transition.
    engine.handle(EngineEvent::CueFinished {
        cue,
        generation: stale_generation,
    });
    assert_eq!(engine.session().run_state, RunState::Idle);
    assert_eq!(log.count(Call::Arm), 0);
    assert_eq!(log.count(Call::Resume), 0);
}

#[test]
fn cancel_outside_preroll_is_ignored() {
    let (mut engine, log, plays) = rig();
    start_running(&mut engine, &plays);
    tick_n(&mut engine, 5);

    log.clear();
    engine.handle(EngineEvent::Intent(Intent::Cancel));
    assert_eq!(engine.session().run_state, RunState::Running);
    assert_eq!(engine.session().remaining_secs, POMODORO_SECS - 5);
    assert!(log.calls().is_empty());
}

#[test]
fn reset_from_running_restores_fresh_and_pauses_media() {
    let (mut engine, log, plays) = rig();
    start_running(&mut engine, &plays);
    tick_n(&mut engine, 100);

    log.clear();
    engine.handle(EngineEvent::Intent(Intent::Reset));
    assert!(engine.session().is_fresh());
    assert_eq!(engine.session().completed_pomodoros, 0);
    assert_eq!(log.calls(), vec![Call::Disarm, Call::PauseMedia]);
}

#[test]
fn reset_preserves_completed_count() {
    let (mut engine, _log, plays) = rig();
    start_running(&mut engine, &plays);
    tick_n(&mut engine, POMODORO_SECS);
    assert_eq!(engine.session().completed_pomodoros, 1);

    start_running(&mut engine, &plays);
    tick_n(&mut engine, 10);
    engine.handle(EngineEvent::Intent(Intent::Reset));
    assert!(engine.session().is_fresh());
    assert_eq!(engine.session().completed_pomodoros, 1);
}

#[test]
fn reset_is_ignored_when_fresh_or_counting_down() {
    let (mut engine, log, plays) = rig();

    // Fresh: nothing to reset.
    engine.handle(EngineEvent::Intent(Intent::Reset));
    assert!(log.calls().is_empty());

    // Counting down: reset is disabled.
    engine.handle(EngineEvent::Intent(Intent::Start));
    log.clear();
    engine.handle(EngineEvent::Intent(Intent::Reset));
    assert_eq!(engine.session().run_state, RunState::CountingDown);
    assert!(log.calls().is_empty());

    // The pre-roll still completes normally afterwards.
    let (cue, generation) = plays.last();
    engine.handle(EngineEvent::CueFinished { cue, generation });
    assert_eq!(engine.session().run_state, RunState::Running);
}

#[test]
fn pause_twice_has_no_double_side_effects() {
    let (mut engine, log, plays) = rig();
    start_running(&mut engine, &plays);
    tick_n(&mut engine, 3);

    engine.handle(EngineEvent::Intent(Intent::Pause));
    let after_first = log.calls();
    let session_after_first = engine.session().clone();

    engine.handle(EngineEvent::Intent(Intent::Pause));
    assert_eq!(log.calls(), after_first, "second pause must be a pure no-op");
    assert_eq!(engine.session(), &session_after_first);
}

#[test]
fn start_while_running_or_counting_down_is_ignored() {
    let (mut engine, log, plays) = rig();
    engine.handle(EngineEvent::Intent(Intent::Start));
    log.clear();
    engine.handle(EngineEvent::Intent(Intent::Start));
    assert!(log.calls().is_empty());

    let (cue, generation) = plays.last();
    engine.handle(EngineEvent::CueFinished { cue, generation });
    log.clear();
    engine.handle(EngineEvent::Intent(Intent::Start));
    assert!(log.calls().is_empty());
}

#[test]
fn ticks_while_idle_are_ignored() {
    let (mut engine, _log, _plays) = rig();
    tick_n(&mut engine, 50);
    assert_eq!(engine.session().remaining_secs, POMODORO_SECS);
}

#[test]
fn remaining_never_exceeds_phase_duration() {
    let (mut engine, _log, plays) = rig();
    start_running(&mut engine, &plays);
    for _ in 0..(POMODORO_SECS * 2 + 7) {
        engine.handle(EngineEvent::Tick);
        let session = engine.session();
        assert!(session.remaining_secs <= session.phase.duration_secs());
        // A completed phase parks the machine; restart it to keep ticking.
        if session.run_state == RunState::Idle {
            start_running(&mut engine, &plays);
        }
    }
}

#[test]
fn engine_without_media_controller_still_works() {
    let log = CallLog::default();
    let plays = PlayLog::default();
    let mut engine = TimerEngine::new(
        Box::new(FakeTicker(log.clone())),
        Box::new(FakeCues {
            log: log.clone(),
            plays: plays.clone(),
        }),
        None,
    );

    start_running(&mut engine, &plays);
    tick_n(&mut engine, POMODORO_SECS);
    assert_eq!(engine.session().completed_pomodoros, 1);
    assert!(engine.session().is_fresh());
}

#[test]
fn custom_next_phase_policy_is_applied() {
    let log = CallLog::default();
    let plays = PlayLog::default();
    let mut engine = TimerEngine::new(
        Box::new(FakeTicker(log.clone())),
        Box::new(FakeCues {
            log: log.clone(),
            plays: plays.clone(),
        }),
        None,
    )
    .with_next_phase(|_, _| Phase::ShortBreak);

    start_running(&mut engine, &plays);
    tick_n(&mut engine, POMODORO_SECS);

    let session = engine.session();
    assert_eq!(session.phase, Phase::ShortBreak);
    assert_eq!(session.remaining_secs, Phase::ShortBreak.duration_secs());
    assert_eq!(session.run_state, RunState::Idle);
}
