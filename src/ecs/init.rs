/// ECS world initialization helpers
///
/// Provides functions to create the battlefield entities and the default level.

use glam::Vec3;
use hecs::{Entity, World};
use std::f32::consts::{FRAC_PI_4, PI};

use crate::ecs::components::*;
use crate::movement::Posture;

/// Create an unnamed tank body of the given kind
pub fn create_body_entity(world: &mut World, kind: EntityType, posture: Posture) -> Entity {
    world.spawn((
        Position(posture.position),
        Heading(posture.base_rotation),
        Turret {
            rotation: posture.turret_rotation,
        },
        kind,
    ))
}

/// Create a player-controlled tank
pub fn create_tank_entity(world: &mut World, name: String, posture: Posture) -> Entity {
    let tank = create_body_entity(world, EntityType::Tank, posture);
    let _ = world.insert_one(tank, Vehicle { name });
    tank
}

/// Create a non-player tank; it only serves as a target
pub fn create_npc_tank_entity(world: &mut World, name: String, posture: Posture) -> Entity {
    let tank = create_body_entity(world, EntityType::NpcTank, posture);
    let _ = world.insert_one(tank, Vehicle { name });
    tank
}

/// Create an empty muzzle smoke cloud
pub fn create_barrel_smoke_entity(world: &mut World) -> Entity {
    world.spawn((
        Position(Vec3::ZERO),
        Heading(0.0),
        SmokeCloud::default(),
        EntityType::BarrelSmoke,
    ))
}

/// Initialize the default level: three player tanks facing two enemies
pub fn init_default_level(world: &mut World) -> (Vec<Entity>, Vec<Entity>) {
    let tanks = vec![
        create_tank_entity(
            world,
            "Alpha".to_string(),
            Posture::facing(Vec3::new(-20.0, 0.0, 16.0), FRAC_PI_4),
        ),
        create_tank_entity(
            world,
            "Bravo".to_string(),
            Posture::facing(Vec3::new(0.0, 0.0, 16.0), 0.0),
        ),
        create_tank_entity(
            world,
            "Charlie".to_string(),
            Posture::facing(Vec3::new(20.0, 0.0, 16.0), -PI / 10.0),
        ),
    ];

    let enemies = vec![
        create_npc_tank_entity(
            world,
            "Enemy 1".to_string(),
            Posture::facing(Vec3::new(-10.0, 0.0, -32.0), PI),
        ),
        create_npc_tank_entity(
            world,
            "Enemy 2".to_string(),
            Posture::facing(Vec3::new(10.0, 0.0, -32.0), PI),
        ),
    ];

    (tanks, enemies)
}
