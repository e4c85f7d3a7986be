use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tank_tactics::{Game, GameConfig, PlanningInput};

const DEFAULT_CONFIG_PATH: &str = "config/tank_tactics.json";
/// Fixed simulation step, in seconds
const FRAME_TIME: f32 = 1.0 / 60.0;
/// Give up on a turn that plays longer than this, in seconds
const MAX_PLAYBACK_TIME: f32 = 120.0;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = GameConfig::load_or_default(&config_path);

    let mut game = Game::with_default_level(config);
    plan_demo_turn(&mut game)?;

    game.start_turn_animation()?;
    let mut played = 0.0;
    while game.is_animating() && played < MAX_PLAYBACK_TIME {
        game.update(FRAME_TIME);
        played += FRAME_TIME;
    }

    for tank in game.player_tanks() {
        if let Some(posture) = game.ecs_world.posture_of(tank) {
            let name = game.ecs_world.name_of(tank).unwrap_or_default();
            info!(
                %name,
                x = posture.position.x,
                z = posture.position.z,
                heading = posture.base_rotation,
                turret = posture.turret_rotation,
                "tank_final_posture"
            );
        }
    }
    info!(
        turn = game.game_manager.current_turn,
        played,
        events = game.events.event_count(),
        "demo_finished"
    );

    println!("{}", game.events.to_json()?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Plan one waypoint and one shot per player tank, like a player would
fn plan_demo_turn(game: &mut Game) -> anyhow::Result<()> {
    let tanks = game.player_tanks();
    let enemies = game.npc_tanks();
    anyhow::ensure!(!enemies.is_empty(), "level has no enemy tanks");

    for (index, tank) in tanks.into_iter().enumerate() {
        let Some(start) = game.ecs_world.posture_of(tank) else {
            continue;
        };

        // first tank turns right, second turns left, the rest drive straight on
        let (waypoint, steps) = match index {
            0 => (Vec3::new(-45.0, 0.0, -25.0), -4),
            1 => (Vec3::new(20.0, 0.0, -10.0), -8),
            _ => (start.position + start.forward_direction() * 30.0, 0),
        };
        let target = enemies[index % enemies.len()];

        game.handle_planning_input(PlanningInput::SelectTank(tank))?;
        game.handle_planning_input(PlanningInput::PointerMoved(waypoint))?;
        game.handle_planning_input(PlanningInput::RotateGhost { steps })?;
        game.handle_planning_input(PlanningInput::ConfirmWaypoint)?;
        game.handle_planning_input(PlanningInput::FireAt(target))?;
        game.handle_planning_input(PlanningInput::Finish)?;

        if let Some(actions) = game.get_tank_turn_actions(tank) {
            info!(
                ?tank,
                actions = actions.len(),
                duration = actions.total_animation_length(),
                "tank_turn_planned"
            );
        }
    }

    Ok(())
}
