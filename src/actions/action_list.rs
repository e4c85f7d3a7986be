use glam::Vec3;

use super::{ActionRules, FireAction, MoveAction, TurnAction};
use crate::error::{PathError, TurnError};
use crate::movement::{NodePosture, Posture};
use crate::overlay::{OverlayCanvas, OverlayProjection};
use crate::scene::{AnimationPosture, SceneNodes};

/// Result of advancing a list to a point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advance {
    /// Every action has been played
    pub finished: bool,
    /// Postures to apply this frame
    pub postures: Vec<AnimationPosture>,
    /// Indices of actions whose completion hook ran during this call
    pub finished_actions: Vec<usize>,
}

/// Actions one unit performs during a turn, oldest first
///
/// Each action starts from the final posture of the action before it; the first
/// starts from the unit's posture at the beginning of the turn. Only the most
/// recent action (the head) may be removed or retargeted.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnActionList {
    start_posture: Posture,
    actions: Vec<TurnAction>,
    rules: ActionRules,
    /// Number of leading actions whose completion hook has run
    completed: usize,
}

impl TurnActionList {
    pub fn new(start_posture: Posture, rules: ActionRules) -> Self {
        Self {
            start_posture,
            actions: Vec::new(),
            rules,
            completed: 0,
        }
    }

    pub fn start_posture(&self) -> Posture {
        self.start_posture
    }

    /// Posture the unit ends the turn in
    pub fn final_posture(&self) -> Posture {
        self.actions
            .last()
            .map(TurnAction::final_posture)
            .unwrap_or(self.start_posture)
    }

    /// Append a move that starts and ends at the current final posture
    ///
    /// The new move is invalid until its target is updated. Returns the posture
    /// it starts from.
    pub fn append_move(&mut self) -> Posture {
        let posture = self.final_posture();
        self.actions
            .push(TurnAction::Move(MoveAction::new(posture, posture, self.rules.movement)));
        posture
    }

    /// Append a shot at `target_position` from the current final posture
    pub fn append_fire(&mut self, target_position: Vec3) -> Posture {
        let posture = self.final_posture();
        let action = FireAction::new(posture, target_position, self.rules.turret);
        let aimed = action.final_posture();
        self.actions.push(TurnAction::Fire(action));
        aimed
    }

    /// Drop the most recent action
    pub fn remove_head(&mut self) -> Option<TurnAction> {
        let removed = self.actions.pop();
        self.completed = self.completed.min(self.actions.len());
        removed
    }

    pub fn head(&self) -> Option<&TurnAction> {
        self.actions.last()
    }

    pub fn is_head_valid(&self) -> Result<bool, TurnError> {
        self.head()
            .map(TurnAction::is_valid)
            .ok_or(TurnError::EmptyActionList)
    }

    /// Retarget the most recent action, which must be a move
    pub fn update_head_move(&mut self, posture: Posture) -> Result<(), TurnError> {
        let head = self.actions.last_mut().ok_or(TurnError::EmptyActionList)?;
        let action = head.as_move_mut().ok_or(TurnError::HeadNotMove)?;
        action.update_target(posture);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnAction> {
        self.actions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&TurnAction> {
        self.actions.get(index)
    }

    /// First action that cannot be played, with the reason
    pub fn first_invalid(&self) -> Option<(usize, PathError)> {
        self.actions
            .iter()
            .enumerate()
            .find_map(|(index, action)| action.path_error().map(|error| (index, error)))
    }

    /// Sum of the action lengths, in seconds
    pub fn total_animation_length(&self) -> f32 {
        // same accumulation order as `advance`, so the two agree exactly
        self.actions
            .iter()
            .fold(0.0, |total, action| total + action.animation_length())
    }

    /// Forget which completion hooks have run, for playing the list again
    pub fn reset_playback(&mut self) {
        self.completed = 0;
    }

    /// Play the list up to `tick` seconds after its start
    ///
    /// Completion hooks run exactly once per action, in order, as soon as the
    /// tick moves past the action's end.
    pub fn advance(&mut self, tick: f32, nodes: &mut dyn SceneNodes) -> Advance {
        let mut advance = Advance::default();
        let mut action_start = 0.0;

        for index in 0..self.actions.len() {
            let action_end = action_start + self.actions[index].animation_length();

            if tick < action_end {
                let local = tick - action_start;
                advance.postures = self.actions[index].animate(local, nodes);
                return advance;
            }

            if index >= self.completed {
                self.actions[index].finish(nodes);
                self.completed = index + 1;
                advance.finished_actions.push(index);
            }

            action_start = action_end;
        }

        advance.finished = true;
        advance.postures = vec![AnimationPosture::unit(NodePosture::Body(self.final_posture()))];
        advance
    }

    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas, projection: &OverlayProjection) {
        for action in &self.actions {
            action.draw_overlays(canvas, projection);
        }
    }
}
