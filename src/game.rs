use glam::Vec3;
use hecs::Entity;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::actions::{ActionKind, ActionRules, TurnAction, TurnActionList};
use crate::config::GameConfig;
use crate::ecs::components::{EntityType, Heading, Position};
use crate::ecs::EcsWorld;
use crate::error::GameError;
use crate::game_manager::GameManager;
use crate::movement::{NodePosture, Posture, TurnEventRecorder};
use crate::overlay::{draw_selection_mark, OverlayCanvas, OverlayProjection};
use crate::scene::{NodeKind, SceneNodes};
use crate::turn_animator::{PlaybackEvent, TurnAnimator};

/// Notification message shown to the player
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub time_remaining: f32, // seconds
}

impl Notification {
    pub fn new(message: String, duration: f32) -> Self {
        Self {
            message,
            time_remaining: duration,
        }
    }
}

/// How long notifications stay on screen, in seconds
const NOTIFICATION_DURATION: f32 = 3.0;

/// Planning input, already resolved to world space by the picking layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlanningInput {
    /// Start planning for a tank
    SelectTank(Entity),
    /// Pointer moved over the ground
    PointerMoved(Vec3),
    /// Rotate the ghost tank by whole rotation steps, positive is counter-clockwise
    RotateGhost { steps: i32 },
    /// Keep the current waypoint and start the next one
    ConfirmWaypoint,
    /// Shoot at a unit from the last confirmed posture
    FireAt(Entity),
    /// Stop planning for the selected tank
    Finish,
}

/// Tank being planned and the ghost tank following the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlanningSession {
    tank: Entity,
    ghost: Entity,
}

/// Main game state
pub struct Game {
    /// Game time in seconds
    pub time: f64,
    pub config: GameConfig,
    /// ECS world holding tanks, ghost tanks and effects
    pub ecs_world: EcsWorld,
    /// Turn phase and counter
    pub game_manager: GameManager,
    /// Planning and playback journal
    pub events: TurnEventRecorder,
    pub notifications: Vec<Notification>,
    /// Planned actions per player tank
    turn_actions: HashMap<Entity, TurnActionList>,
    /// Ghost tanks per player tank, one per move action, oldest first
    ghost_tanks: HashMap<Entity, Vec<Entity>>,
    turn_animator: TurnAnimator,
    planning: Option<PlanningSession>,
    projection: OverlayProjection,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let ecs_world = EcsWorld::new(config.turret.max_smoke_size);
        let projection = OverlayProjection::from_config(&config.overlay);
        let game_manager = GameManager::default();
        let events = TurnEventRecorder::new(game_manager.current_turn);

        Self {
            time: 0.0,
            config,
            ecs_world,
            game_manager,
            events,
            notifications: Vec::new(),
            turn_actions: HashMap::new(),
            ghost_tanks: HashMap::new(),
            turn_animator: TurnAnimator::new(),
            planning: None,
            projection,
        }
    }

    /// New game on the default level
    pub fn with_default_level(config: GameConfig) -> Self {
        let mut game = Self::new(config);
        let (tanks, enemies) = crate::ecs::init::init_default_level(&mut game.ecs_world.world);
        info!(tanks = tanks.len(), enemies = enemies.len(), "level_loaded");
        game
    }

    pub fn spawn_tank(&mut self, name: &str, posture: Posture) -> Entity {
        crate::ecs::init::create_tank_entity(&mut self.ecs_world.world, name.to_string(), posture)
    }

    pub fn spawn_npc_tank(&mut self, name: &str, posture: Posture) -> Entity {
        crate::ecs::init::create_npc_tank_entity(&mut self.ecs_world.world, name.to_string(), posture)
    }

    pub fn player_tanks(&self) -> Vec<Entity> {
        self.ecs_world.entities_of(EntityType::Tank)
    }

    pub fn npc_tanks(&self) -> Vec<Entity> {
        self.ecs_world.entities_of(EntityType::NpcTank)
    }

    pub fn ghost_tanks(&self, tank: Entity) -> &[Entity] {
        self.ghost_tanks.get(&tank).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tank currently being planned, if any
    pub fn selected_tank(&self) -> Option<Entity> {
        self.planning.map(|session| session.tank)
    }

    /// Ghost tank following the pointer, if any
    pub fn active_ghost(&self) -> Option<Entity> {
        self.planning.map(|session| session.ghost)
    }

    pub fn is_animating(&self) -> bool {
        self.turn_animator.is_running()
    }

    fn rules(&self) -> ActionRules {
        ActionRules::from_config(&self.config)
    }

    fn ensure_planning(&self) -> Result<(), GameError> {
        if self.game_manager.is_playing_back() {
            return Err(GameError::PlaybackInProgress);
        }
        Ok(())
    }

    fn tank_posture(&self, tank: Entity) -> Result<Posture, GameError> {
        if self.ecs_world.entity_type(tank) != Some(EntityType::Tank) {
            return Err(GameError::NotATank(tank));
        }
        self.ecs_world.posture_of(tank).ok_or(GameError::NotATank(tank))
    }

    fn actions_mut(&mut self, tank: Entity) -> Result<&mut TurnActionList, GameError> {
        self.turn_actions.get_mut(&tank).ok_or(GameError::NoTurnActions(tank))
    }

    pub fn add_notification(&mut self, message: String, duration: f32) {
        self.notifications.push(Notification::new(message, duration));
    }

    fn create_ghost_tank(&mut self, tank: Entity, posture: Posture) -> Entity {
        let ghost = self.ecs_world.instantiate(NodeKind::GhostTank);
        self.ecs_world.apply_posture(ghost, &NodePosture::Body(posture));
        self.ghost_tanks.entry(tank).or_default().push(ghost);
        ghost
    }

    fn remove_ghost_tanks(&mut self, tank: Entity) {
        for ghost in self.ghost_tanks.remove(&tank).unwrap_or_default() {
            self.ecs_world.destroy(ghost);
        }
    }

    /*
     * tank turn actions
     */

    pub fn get_tank_turn_actions(&self, tank: Entity) -> Option<&TurnActionList> {
        self.turn_actions.get(&tank)
    }

    /// Every planned list, in tank order
    pub fn all_tank_turn_actions(&self) -> Vec<(Entity, &TurnActionList)> {
        let mut all: Vec<(Entity, &TurnActionList)> =
            self.turn_actions.iter().map(|(tank, actions)| (*tank, actions)).collect();
        all.sort_by_key(|(tank, _)| tank.to_bits());
        all
    }

    /// Start a fresh action list for `tank` with a provisional first move
    ///
    /// Returns the ghost tank marking the move's target.
    pub fn setup_new_turn(&mut self, tank: Entity) -> Result<Entity, GameError> {
        self.ensure_planning()?;
        let posture = self.tank_posture(tank)?;

        if self.turn_actions.contains_key(&tank) {
            self.remove_ghost_tanks(tank);
        }

        let mut actions = TurnActionList::new(posture, self.rules());
        actions.append_move();
        self.turn_actions.insert(tank, actions);

        self.events.record_planning_started(tank, self.time);
        self.events.record_action_appended(tank, ActionKind::Move, self.time);
        debug!(?tank, "turn_planning_started");

        Ok(self.create_ghost_tank(tank, posture))
    }

    /// Append a provisional move; returns its ghost tank
    pub fn add_move_action(&mut self, tank: Entity) -> Result<Entity, GameError> {
        self.ensure_planning()?;
        let start = self.actions_mut(tank)?.append_move();
        self.events.record_action_appended(tank, ActionKind::Move, self.time);
        Ok(self.create_ghost_tank(tank, start))
    }

    /// Append a shot at the current position of `target`
    pub fn add_fire_action(&mut self, tank: Entity, target: Entity) -> Result<Posture, GameError> {
        self.ensure_planning()?;
        let target_position = self
            .ecs_world
            .position_of(target)
            .ok_or(GameError::UnknownTarget(target))?;

        let aimed = self.actions_mut(tank)?.append_fire(target_position);
        self.events.record_action_appended(tank, ActionKind::Fire, self.time);
        debug!(?tank, ?target, "fire_action_added");
        Ok(aimed)
    }

    /// Retarget the head move to where its ghost tank now stands
    pub fn update_last_move_action(&mut self, tank: Entity) -> Result<(), GameError> {
        self.ensure_planning()?;
        let ghost = self
            .ghost_tanks(tank)
            .last()
            .copied()
            .ok_or(GameError::NoTurnActions(tank))?;
        let posture = self
            .ecs_world
            .posture_of(ghost)
            .ok_or(GameError::NoTurnActions(tank))?;

        self.actions_mut(tank)?.update_head_move(posture)?;
        Ok(())
    }

    pub fn last_action_valid(&self, tank: Entity) -> Result<bool, GameError> {
        let actions = self.turn_actions.get(&tank).ok_or(GameError::NoTurnActions(tank))?;
        Ok(actions.is_head_valid()?)
    }

    /// Drop the head action, and its ghost tank when it is a move
    fn drop_last_action(&mut self, tank: Entity) -> Result<Option<TurnAction>, GameError> {
        let removed = self.actions_mut(tank)?.remove_head();

        if let Some(action) = &removed {
            self.events.record_action_removed(tank, action.kind(), self.time);
            if action.kind() == ActionKind::Move {
                let ghost = self.ghost_tanks.get_mut(&tank).and_then(Vec::pop);
                if let Some(ghost) = ghost {
                    self.ecs_world.destroy(ghost);
                }
            }
        }

        Ok(removed)
    }

    /// Drop the provisional head action; a list left empty is removed
    pub fn finalize_turn_actions(&mut self, tank: Entity) -> Result<(), GameError> {
        self.ensure_planning()?;
        self.drop_last_action(tank)?;

        if self.turn_actions.get(&tank).is_some_and(TurnActionList::is_empty) {
            self.turn_actions.remove(&tank);
            self.remove_ghost_tanks(tank);
        }
        Ok(())
    }

    /// Commit the planned turn and start playing it
    pub fn start_turn_animation(&mut self) -> Result<(), GameError> {
        self.ensure_planning()?;

        // planning in progress counts as finished, minus its provisional move
        let selected = self.selected_tank();
        let snapshot: Vec<(Entity, TurnActionList)> = self
            .turn_actions
            .iter()
            .filter_map(|(tank, actions)| {
                let mut actions = actions.clone();
                if selected == Some(*tank) {
                    actions.remove_head();
                }
                (!actions.is_empty()).then_some((*tank, actions))
            })
            .collect();
        let unit_count = snapshot.len();

        // a rejected turn leaves the open session untouched
        self.turn_animator.start(snapshot, self.time)?;

        if let Some(session) = self.planning {
            self.finish_planning(session)?;
        }
        self.game_manager.begin_playback(self.time);
        self.events.record_turn_committed(unit_count, self.time);
        Ok(())
    }

    fn finish_turn(&mut self) {
        let tanks: Vec<Entity> = self.turn_actions.keys().copied().collect();
        for tank in tanks {
            self.remove_ghost_tanks(tank);
        }
        self.turn_actions.clear();

        self.game_manager.end_playback(self.time);
        self.events.next_turn();
        self.add_notification(
            format!("Turn {} begins", self.game_manager.current_turn),
            NOTIFICATION_DURATION,
        );
    }

    /*
     * planning input
     */

    fn finish_planning(&mut self, session: PlanningSession) -> Result<(), GameError> {
        self.planning = None;
        self.finalize_turn_actions(session.tank)
    }

    fn move_ghost(&mut self, tank: Entity, ghost: Entity, to: Option<Vec3>, turn: f32) -> Result<(), GameError> {
        if let Ok(mut position) = self.ecs_world.world.get::<&mut Position>(ghost) {
            if let Some(to) = to {
                // ghost stays on its own ground height
                position.0 = Vec3::new(to.x, position.0.y, to.z);
            }
        }
        if let Ok(mut heading) = self.ecs_world.world.get::<&mut Heading>(ghost) {
            heading.0 = crate::movement::clamp_angle(heading.0 + turn);
        }
        self.update_last_move_action(tank)
    }

    /// Apply one planning input
    pub fn handle_planning_input(&mut self, input: PlanningInput) -> Result<(), GameError> {
        self.ensure_planning()?;

        match input {
            PlanningInput::SelectTank(tank) => {
                self.tank_posture(tank)?;
                if let Some(session) = self.planning {
                    self.finish_planning(session)?;
                }
                let ghost = self.setup_new_turn(tank)?;
                self.planning = Some(PlanningSession { tank, ghost });
            }
            PlanningInput::PointerMoved(ground) => {
                if let Some(session) = self.planning {
                    self.move_ghost(session.tank, session.ghost, Some(ground), 0.0)?;
                }
            }
            PlanningInput::RotateGhost { steps } => {
                if let Some(session) = self.planning {
                    let turn = steps as f32 * self.config.planning.ghost_rotation_step;
                    self.move_ghost(session.tank, session.ghost, None, turn)?;
                }
            }
            PlanningInput::ConfirmWaypoint => {
                let session = self.planning.ok_or(GameError::NothingSelected)?;
                if self.last_action_valid(session.tank)? {
                    let ghost = self.add_move_action(session.tank)?;
                    self.planning = Some(PlanningSession { ghost, ..session });
                } else {
                    let name = self
                        .ecs_world
                        .name_of(session.tank)
                        .unwrap_or_else(|| "Tank".to_string());
                    warn!(tank = ?session.tank, %name, "waypoint_unreachable");
                    self.add_notification(format!("{name}: no path to this waypoint"), NOTIFICATION_DURATION);
                }
            }
            PlanningInput::FireAt(target) => {
                let session = self.planning.ok_or(GameError::NothingSelected)?;
                if self.ecs_world.position_of(target).is_none() {
                    return Err(GameError::UnknownTarget(target));
                }

                // the unconfirmed move is replaced by the shot
                self.drop_last_action(session.tank)?;
                self.add_fire_action(session.tank, target)?;
                let ghost = self.add_move_action(session.tank)?;
                self.planning = Some(PlanningSession { ghost, ..session });
            }
            PlanningInput::Finish => {
                if let Some(session) = self.planning {
                    self.finish_planning(session)?;
                }
            }
        }

        Ok(())
    }

    /*
     * frame update
     */

    /// Update game logic
    pub fn update(&mut self, delta_time: f32) {
        self.time += delta_time as f64;

        if self.turn_animator.is_running() {
            let playback = self.turn_animator.update(self.time, &mut self.ecs_world);
            for event in playback {
                match event {
                    PlaybackEvent::ActionFinished { unit, index } => {
                        self.events.record_action_finished(unit, index, self.time);
                    }
                    PlaybackEvent::UnitFinished { unit } => {
                        self.events.record_unit_finished(unit, self.time);
                    }
                    PlaybackEvent::TurnFinished => {
                        self.events.record_turn_finished(self.time);
                        self.finish_turn();
                    }
                }
            }
        }

        // Update notifications
        self.notifications.retain_mut(|notif| {
            notif.time_remaining -= delta_time;
            notif.time_remaining > 0.0
        });
    }

    /// Draw planned paths, shots and the selection ring
    pub fn draw_overlays(&self, canvas: &mut dyn OverlayCanvas) {
        for (_, actions) in self.all_tank_turn_actions() {
            actions.draw_overlays(canvas, &self.projection);
        }

        if let Some(position) = self.selected_tank().and_then(|tank| self.ecs_world.position_of(tank)) {
            draw_selection_mark(canvas, &self.projection, position);
        }
    }
}
