//! Spin controller
//!
//! `Wheel` owns every piece of mutable wheel state: outcomes, gate, rotation
//! and the live session. Nothing here is global, so several wheels can run
//! side by side, and time and randomness are always injected.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::gate::{Gate, GateState, GateTransition};
use super::outcome::{Generated, Outcome, OutcomeConfig, OutcomeSet};
use super::spin::{SpinParams, SpinSession};
use crate::consts::MIN_OUTCOMES;
use crate::effects::{AudioPlayer, CelebrationEffect, NoAudio, NoCelebration};
use crate::error::{OutcomeError, SpinError};
use crate::settings::WheelSettings;

/// Outbound signals for UI collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum WheelEvent {
    Unlocked,
    Locked,
    /// Spin started toward a pre-decided outcome
    SpinStarted { index: usize },
    /// Slice boundary passed the pointer
    Tick,
    /// Final result, emitted once per completed spin
    Result(Outcome),
    /// Outcome set replaced
    OutcomesChanged { count: usize, clamped: bool },
}

/// What a frame did
#[derive(Debug, Clone, PartialEq)]
pub enum FrameStatus {
    /// No spin is live
    Idle,
    /// Keep requesting frames
    Spinning,
    /// Spin finished this frame
    Finished(Outcome),
}

/// A single wheel instance
pub struct Wheel {
    outcomes: OutcomeSet,
    gate: Gate,
    /// Accumulated rotation (radians, unbounded)
    rotation: f64,
    session: Option<SpinSession>,
    params: SpinParams,
    rng: Pcg32,
    audio: Box<dyn AudioPlayer>,
    celebration: Box<dyn CelebrationEffect>,
    events: Vec<WheelEvent>,
    last_result: Option<Outcome>,
}

impl Wheel {
    /// Create a locked wheel with no effects
    pub fn new(outcomes: OutcomeSet, params: SpinParams, seed: u64) -> Self {
        Self {
            outcomes,
            gate: Gate::new(),
            rotation: 0.0,
            session: None,
            params,
            rng: Pcg32::seed_from_u64(seed),
            audio: Box::new(NoAudio),
            celebration: Box::new(NoCelebration),
            events: Vec::new(),
            last_result: None,
        }
    }

    /// Create a wheel from settings, generating numeric outcomes if configured
    pub fn from_settings(settings: &WheelSettings, seed: u64) -> Result<Self, OutcomeError> {
        let settings = settings.validated();
        let mut wheel = Self::new(OutcomeSet::curated(), settings.spin_params(), seed);
        if let Some((config, requested)) = settings.outcomes.amounts() {
            let generated = OutcomeSet::generate(&config, requested, &mut wheel.rng)?;
            let clamped = generated.was_clamped();
            wheel.replace_outcomes(generated.outcomes, clamped);
        }
        Ok(wheel)
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioPlayer>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_celebration(mut self, celebration: Box<dyn CelebrationEffect>) -> Self {
        self.celebration = celebration;
        self
    }

    pub fn outcomes(&self) -> &OutcomeSet {
        &self.outcomes
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    pub fn session(&self) -> Option<&SpinSession> {
        self.session.as_ref()
    }

    pub fn last_result(&self) -> Option<&Outcome> {
        self.last_result.as_ref()
    }

    pub fn params(&self) -> &SpinParams {
        &self.params
    }

    /// Whether the spin trigger should be enabled
    pub fn can_spin(&self) -> bool {
        self.gate.is_unlocked() && self.outcomes.len() >= MIN_OUTCOMES
    }

    /// Status line for the UI
    pub fn status_text(&self) -> &'static str {
        match self.gate.state() {
            GateState::Locked if self.gate.spins_completed() > 0 => {
                "Spin used. (Cosmetic result only.)"
            }
            GateState::Locked => "Locked — complete contribution to unlock.",
            GateState::Unlocked => "Unlocked — you may spin once for a cosmetic badge.",
            GateState::Spinning => "Spinning…",
        }
    }

    /// Grant one spin (inbound signal from a completed payment)
    pub fn unlock(&mut self) {
        match self.gate.unlock() {
            GateTransition::Unlocked => {
                log::info!("Wheel unlocked");
                self.events.push(WheelEvent::Unlocked);
            }
            GateTransition::Queued => log::info!("Unlock queued until current spin finishes"),
            _ => log::debug!("Unlock ignored: already entitled"),
        }
    }

    /// Start a spin at `now_ms`. The outcome is drawn here, before any motion
    /// is planned, and returned to the caller.
    pub fn spin(&mut self, now_ms: f64) -> Result<usize, SpinError> {
        let count = self.outcomes.len();
        if count < MIN_OUTCOMES {
            return Err(SpinError::InsufficientOutcomes { count });
        }
        if let Err(e) = self.gate.try_spin() {
            log::debug!("Spin ignored: gate is {:?}", self.gate.state());
            return Err(e);
        }

        let index = self.rng.random_range(0..count);
        let min_turns = self.params.min_turns.min(self.params.max_turns);
        let extra_turns = self.rng.random_range(min_turns..=self.params.max_turns);

        let session = SpinSession::new(
            index,
            count,
            self.rotation,
            extra_turns,
            now_ms,
            &self.params,
        );
        log::info!(
            "Spin started: index {} of {}, {} turns, {:.0}ms",
            index,
            count,
            extra_turns,
            session.duration_ms
        );
        self.session = Some(session);
        self.events.push(WheelEvent::SpinStarted { index });
        Ok(index)
    }

    /// Advance the live spin to `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> FrameStatus {
        let Some(session) = self.session.as_mut() else {
            return FrameStatus::Idle;
        };

        let frame = session.step(now_ms);
        self.rotation = frame.rotation;

        if frame.tick {
            self.audio.play_tick();
            self.events.push(WheelEvent::Tick);
        }

        if !frame.finished {
            return FrameStatus::Spinning;
        }

        let index = session.index;
        self.session = None;
        self.finish(index)
    }

    fn finish(&mut self, index: usize) -> FrameStatus {
        let Some(outcome) = self.outcomes.get(index).cloned() else {
            // Outcomes are frozen while a session is live
            log::error!("Spin finished on missing outcome {}", index);
            return FrameStatus::Idle;
        };

        let transition = self.gate.on_spin_complete();
        log::info!("Spin finished: {}", outcome.label);

        self.last_result = Some(outcome.clone());
        self.events.push(WheelEvent::Result(outcome.clone()));
        self.events.push(WheelEvent::Locked);
        if transition == GateTransition::Unlocked {
            self.events.push(WheelEvent::Unlocked);
        }
        self.celebration.celebrate();

        FrameStatus::Finished(outcome)
    }

    /// Drop the live session without completing it (host torn down). The gate
    /// stays consumed and no result is emitted.
    pub fn abandon(&mut self) {
        if let Some(session) = self.session.take() {
            log::warn!(
                "Spin abandoned before completion (index {}); gate left in progress",
                session.index
            );
        }
    }

    /// Outcomes may only change between rounds
    pub fn can_regenerate(&self) -> bool {
        self.gate.state() != GateState::Spinning
    }

    /// Replace outcomes between rounds with freshly generated values
    pub fn regenerate(
        &mut self,
        config: &OutcomeConfig,
        requested: usize,
    ) -> Result<Generated, OutcomeError> {
        if !self.can_regenerate() {
            return Err(OutcomeError::RoundInProgress);
        }
        let generated = OutcomeSet::generate(config, requested, &mut self.rng)?;
        log::info!("Outcomes regenerated: {} slices", generated.count);
        self.replace_outcomes(generated.outcomes.clone(), generated.was_clamped());
        Ok(generated)
    }

    fn replace_outcomes(&mut self, outcomes: OutcomeSet, clamped: bool) {
        self.events.push(WheelEvent::OutcomesChanged {
            count: outcomes.len(),
            clamped,
        });
        self.outcomes = outcomes;
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<WheelEvent> {
        std::mem::take(&mut self.events)
    }
}
