/// ECS World and Component System
///
/// This module provides:
/// - Component definitions for tanks, ghost tanks and smoke effects
/// - Entity creation helpers
/// - The scene-node implementation turn playback drives

pub mod components;
pub mod init;

use hecs::{Entity, World};
use tracing::{trace, warn};

use crate::movement::{NodePosture, Posture};
use crate::scene::{NodeHandle, NodeKind, SceneNodes};
use components::*;

/// The main ECS world containing all entities
pub struct EcsWorld {
    /// hecs World - stores all entities and components
    pub world: World,

    /// Smoke cloud radius at full size, in meters
    pub max_smoke_size: f32,
}

impl EcsWorld {
    pub fn new(max_smoke_size: f32) -> Self {
        Self {
            world: World::new(),
            max_smoke_size,
        }
    }

    /// Current body posture of a tank or ghost tank
    pub fn posture_of(&self, entity: Entity) -> Option<Posture> {
        let position = self.world.get::<&Position>(entity).ok()?;
        let heading = self.world.get::<&Heading>(entity).ok()?;
        let turret = self.world.get::<&Turret>(entity).ok();
        Some(posture_from(&position, &heading, turret.as_deref()))
    }

    pub fn position_of(&self, entity: Entity) -> Option<glam::Vec3> {
        self.world.get::<&Position>(entity).ok().map(|position| position.0)
    }

    /// Display name of a named tank
    pub fn name_of(&self, entity: Entity) -> Option<String> {
        self.world.get::<&Vehicle>(entity).ok().map(|vehicle| vehicle.name.clone())
    }

    pub fn entity_type(&self, entity: Entity) -> Option<EntityType> {
        self.world.get::<&EntityType>(entity).ok().map(|kind| *kind)
    }

    /// All entities of one type
    pub fn entities_of(&self, kind: EntityType) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .world
            .query::<&EntityType>()
            .iter()
            .filter(|(_, entity_type)| **entity_type == kind)
            .map(|(entity, _)| entity)
            .collect();
        entities.sort_by_key(|entity| entity.to_bits());
        entities
    }

    /// Get the number of entities
    pub fn entity_count(&self) -> u32 {
        self.world.len()
    }
}

impl SceneNodes for EcsWorld {
    fn instantiate(&mut self, kind: NodeKind) -> NodeHandle {
        let entity = match kind {
            NodeKind::BarrelSmoke => init::create_barrel_smoke_entity(&mut self.world),
            NodeKind::Tank | NodeKind::NpcTank | NodeKind::GhostTank => {
                init::create_body_entity(&mut self.world, kind, Posture::default())
            }
        };
        trace!(?entity, ?kind, "node_instantiated");
        entity
    }

    fn destroy(&mut self, handle: NodeHandle) {
        if self.world.despawn(handle).is_err() {
            warn!(?handle, "destroy_missing_node");
        }
    }

    fn apply_posture(&mut self, handle: NodeHandle, posture: &NodePosture) {
        if !self.world.contains(handle) {
            warn!(?handle, "posture_for_missing_node");
            return;
        }

        let (position, rotation) = match posture {
            NodePosture::Body(body) => (body.position, body.base_rotation),
            NodePosture::Smoke(smoke) => (smoke.position, smoke.rotation),
        };

        if let Ok(mut current) = self.world.get::<&mut Position>(handle) {
            current.0 = position;
        }
        if let Ok(mut heading) = self.world.get::<&mut Heading>(handle) {
            heading.0 = rotation;
        }

        match posture {
            NodePosture::Body(body) => {
                if let Ok(mut turret) = self.world.get::<&mut Turret>(handle) {
                    turret.rotation = body.turret_rotation;
                }
            }
            NodePosture::Smoke(smoke) => {
                if let Ok(mut cloud) = self.world.get::<&mut SmokeCloud>(handle) {
                    *cloud = SmokeCloud::sized(smoke.size, self.max_smoke_size);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::SmokePosture;
    use glam::Vec3;

    #[test]
    fn test_body_posture_applies_to_tank() {
        let mut ecs = EcsWorld::new(3.6);
        let tank = init::create_tank_entity(&mut ecs.world, "Alpha".to_string(), Posture::default());

        let posture = Posture::new(Vec3::new(4.0, 0.0, -3.0), 1.0, -0.5);
        ecs.apply_posture(tank, &NodePosture::Body(posture));

        assert_eq!(ecs.posture_of(tank), Some(posture));
        assert_eq!(ecs.entity_type(tank), Some(EntityType::Tank));
        assert_eq!(ecs.name_of(tank).as_deref(), Some("Alpha"));
    }

    #[test]
    fn test_instantiated_bodies_are_unnamed() {
        let mut ecs = EcsWorld::new(3.6);
        let ghost = ecs.instantiate(NodeKind::GhostTank);
        let npc = ecs.instantiate(NodeKind::NpcTank);

        assert_eq!(ecs.entity_type(ghost), Some(EntityType::GhostTank));
        assert_eq!(ecs.entity_type(npc), Some(EntityType::NpcTank));
        assert_eq!(ecs.posture_of(ghost), Some(Posture::default()));
        assert_eq!(ecs.name_of(ghost), None);
    }

    #[test]
    fn test_smoke_lifecycle() {
        let mut ecs = EcsWorld::new(3.6);
        let smoke = ecs.instantiate(NodeKind::BarrelSmoke);
        assert_eq!(ecs.entity_count(), 1);

        ecs.apply_posture(
            smoke,
            &NodePosture::Smoke(SmokePosture {
                position: Vec3::new(0.0, 1.6, -4.2),
                rotation: 0.0,
                size: 0.5,
            }),
        );

        {
            let cloud = ecs.world.get::<&SmokeCloud>(smoke).unwrap();
            assert!((cloud.radius - 1.8).abs() < 1e-6);
            assert!((cloud.height - 0.9).abs() < 1e-6);
        }
        assert_eq!(ecs.position_of(smoke), Some(Vec3::new(0.0, 1.6, -4.2)));

        ecs.destroy(smoke);
        assert_eq!(ecs.entity_count(), 0);

        // stale handles are ignored
        ecs.destroy(smoke);
        ecs.apply_posture(smoke, &NodePosture::Body(Posture::default()));
    }

    #[test]
    fn test_default_level() {
        let mut ecs = EcsWorld::new(3.6);
        let (tanks, enemies) = init::init_default_level(&mut ecs.world);

        assert_eq!(tanks.len(), 3);
        assert_eq!(enemies.len(), 2);
        assert_eq!(ecs.entities_of(EntityType::Tank), tanks);
        assert_eq!(ecs.entities_of(EntityType::NpcTank), enemies);
    }
}
