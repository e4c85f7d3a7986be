/// Synchronized playback of every unit's planned turn
///
/// All lists are advanced with the same elapsed time, measured from one shared
/// start timestamp, so the units move together.

use hecs::Entity;
use tracing::{debug, info};

use crate::actions::TurnActionList;
use crate::error::TurnError;
use crate::scene::{AnimationTarget, SceneNodes};

/// Something that completed during a playback tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    ActionFinished { unit: Entity, index: usize },
    UnitFinished { unit: Entity },
    TurnFinished,
}

struct UnitPlayback {
    unit: Entity,
    actions: TurnActionList,
    finished: bool,
}

struct Playback {
    units: Vec<UnitPlayback>,
    start_time: f64,
}

/// Global turn playback scheduler, idle until a turn is started
#[derive(Default)]
pub struct TurnAnimator {
    playback: Option<Playback>,
}

impl TurnAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.playback.is_some()
    }

    /// Timestamp the running turn started at
    pub fn start_time(&self) -> Option<f64> {
        self.playback.as_ref().map(|playback| playback.start_time)
    }

    /// Begin playing the given action lists from `now`
    ///
    /// Lists are played in unit order so that runs are reproducible.
    pub fn start(
        &mut self,
        turns: impl IntoIterator<Item = (Entity, TurnActionList)>,
        now: f64,
    ) -> Result<(), TurnError> {
        if self.is_running() {
            return Err(TurnError::AlreadyRunning);
        }

        let mut units: Vec<UnitPlayback> = turns
            .into_iter()
            .map(|(unit, mut actions)| {
                actions.reset_playback();
                UnitPlayback {
                    unit,
                    actions,
                    finished: false,
                }
            })
            .collect();

        if units.is_empty() {
            return Err(TurnError::NothingToAnimate);
        }

        for unit in &units {
            if let Some((index, source)) = unit.actions.first_invalid() {
                return Err(TurnError::InvalidAction {
                    unit: unit.unit,
                    index,
                    source,
                });
            }
        }

        units.sort_by_key(|unit| unit.unit.to_bits());

        let longest = units
            .iter()
            .map(|unit| unit.actions.total_animation_length())
            .fold(0.0, f32::max);
        info!(units = units.len(), duration = longest, start_time = now, "turn_playback_started");

        self.playback = Some(Playback {
            units,
            start_time: now,
        });
        Ok(())
    }

    /// Advance every list to `elapsed` seconds after the start
    ///
    /// Postures are pushed into the scene. Returns what completed; the last tick of a
    /// turn reports `TurnFinished` and leaves the animator idle.
    pub fn tick(&mut self, elapsed: f32, nodes: &mut dyn SceneNodes) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        let Some(playback) = self.playback.as_mut() else {
            return events;
        };

        for unit in &mut playback.units {
            let advance = unit.actions.advance(elapsed, nodes);

            for posture in &advance.postures {
                let handle = match posture.target {
                    AnimationTarget::Unit => unit.unit,
                    AnimationTarget::Node(handle) => handle,
                };
                nodes.apply_posture(handle, &posture.posture);
            }

            for index in advance.finished_actions {
                debug!(unit = ?unit.unit, index, "action_finished");
                events.push(PlaybackEvent::ActionFinished {
                    unit: unit.unit,
                    index,
                });
            }

            if advance.finished && !unit.finished {
                unit.finished = true;
                debug!(unit = ?unit.unit, "unit_finished");
                events.push(PlaybackEvent::UnitFinished { unit: unit.unit });
            }
        }

        if playback.units.iter().all(|unit| unit.finished) {
            info!(elapsed, "turn_playback_finished");
            self.playback = None;
            events.push(PlaybackEvent::TurnFinished);
        }

        events
    }

    /// Advance to game time `now`
    pub fn update(&mut self, now: f64, nodes: &mut dyn SceneNodes) -> Vec<PlaybackEvent> {
        match self.start_time() {
            Some(start_time) => self.tick((now - start_time) as f32, nodes),
            None => Vec::new(),
        }
    }
}
