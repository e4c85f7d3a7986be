use anyhow::Result;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Movement speed along a path, in meters per second
pub const DEFAULT_MOVEMENT_SPEED: f32 = 10.0;
/// Minimum turn radius of a tank, in meters
pub const DEFAULT_TURN_RADIUS: f32 = 12.0;
/// Turret traverse speed, in radians per second
pub const DEFAULT_TURRET_ROTATION_SPEED: f32 = 0.8;
/// Duration of the muzzle smoke effect, in seconds
pub const DEFAULT_FIRING_EFFECT_DURATION: f32 = 1.0;
/// Muzzle smoke cloud radius at full size, in meters
pub const DEFAULT_MAX_SMOKE_SIZE: f32 = 3.6;

/// Complete game configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    pub movement: MovementConfigData,
    pub turret: TurretConfigData,
    pub planning: PlanningConfigData,
    pub overlay: OverlayConfigData,
}

impl GameConfig {
    /// Load configuration from JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file with pretty formatting
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|error| {
            tracing::warn!(path = %path.display(), %error, "config_load_failed_using_defaults");
            let config = Self::default();
            // Try to save the default config
            if let Err(error) = config.save(path) {
                tracing::warn!(path = %path.display(), %error, "config_save_failed");
            }
            config
        })
    }
}

/// Tank movement parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementConfigData {
    /// Meters per second
    pub speed: f32,
    /// Arc radius used for every turn, in meters
    pub turn_radius: f32,
}

impl Default for MovementConfigData {
    fn default() -> Self {
        Self {
            speed: DEFAULT_MOVEMENT_SPEED,
            turn_radius: DEFAULT_TURN_RADIUS,
        }
    }
}

/// Turret and firing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurretConfigData {
    /// Radians per second
    pub rotation_speed: f32,
    /// Seconds
    pub firing_effect_duration: f32,

    /// Gun muzzle relative to the tank origin, in turret space (-Z is the gun axis)
    #[serde(with = "vec3_serde")]
    pub muzzle_offset: Vec3,

    pub max_smoke_size: f32,
}

impl Default for TurretConfigData {
    fn default() -> Self {
        Self {
            rotation_speed: DEFAULT_TURRET_ROTATION_SPEED,
            firing_effect_duration: DEFAULT_FIRING_EFFECT_DURATION,
            muzzle_offset: Vec3::new(0.0, 1.6, -4.2),
            max_smoke_size: DEFAULT_MAX_SMOKE_SIZE,
        }
    }
}

/// Planning (ghost tank) parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfigData {
    /// Ghost tank rotation per scroll step, in radians
    pub ghost_rotation_step: f32,
}

impl Default for PlanningConfigData {
    fn default() -> Self {
        Self {
            ghost_rotation_step: std::f32::consts::PI / 16.0,
        }
    }
}

/// Ground overlay parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfigData {
    /// Overlay texture edge, in pixels
    pub overlay_pixels: f32,
    /// Ground plane size (X, Z), in meters
    pub ground_plane_size: [f32; 2],
    /// Planned path width, in meters
    pub path_width: f32,
    pub arc_point_count: u32,
}

impl Default for OverlayConfigData {
    fn default() -> Self {
        Self {
            overlay_pixels: 2048.0,
            ground_plane_size: [256.0, 256.0],
            path_width: 1.0,
            arc_point_count: 32,
        }
    }
}

/// Custom serialization for Vec3
mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S>(vec: &Vec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Vec3Data {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = Vec3Data::deserialize(deserializer)?;
        Ok(Vec3::new(data.x, data.y, data.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.movement.speed, 10.0);
        assert_eq!(config.movement.turn_radius, 12.0);
        assert_eq!(config.turret.rotation_speed, 0.8);
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("game.json");

        let mut config = GameConfig::default();
        config.movement.speed = 7.5;
        config.turret.muzzle_offset = Vec3::new(0.5, 2.0, -5.0);

        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();

        assert_eq!(loaded.movement.speed, 7.5);
        assert_eq!(loaded.turret.muzzle_offset, Vec3::new(0.5, 2.0, -5.0));
    }

    #[test]
    fn test_muzzle_offset_is_readable_json() {
        let json = serde_json::to_string(&TurretConfigData::default()).unwrap();
        assert!(json.contains("\"muzzle_offset\":{\"x\":0.0,\"y\":1.6,\"z\":-4.2}"), "{}", json);
    }

    #[test]
    fn test_load_or_default_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let config = GameConfig::load_or_default(&path);
        assert_eq!(config.movement.turn_radius, DEFAULT_TURN_RADIUS);
        assert!(path.exists());
    }
}
