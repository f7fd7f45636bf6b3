use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating an [`ActorConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("orientation gate must lie in [0, 90] degrees, got {0}")]
    GateOutOfRange(f32),
}

/// Animation clip names the controller plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipNames {
    pub intro: String,
    pub idle: String,
    pub walk: String,
    pub interact: String,
}

impl Default for ClipNames {
    fn default() -> Self {
        Self {
            intro: "WigglingTail".into(),
            idle: "Breathing".into(),
            walk: "Walking02".into(),
            interact: "EatingCycle".into(),
        }
    }
}

/// Sound cue names the controller fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueNames {
    /// Carried prop struck an obstacle and the action rolled back.
    pub impact: String,
    /// Goal reached while carrying.
    pub win: String,
}

impl Default for CueNames {
    fn default() -> Self {
        Self {
            impact: "stick_hit_rock".into(),
            win: "win".into(),
        }
    }
}

/// Tuning for the actor and its actions. Every field has a default, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Length of one move step.
    pub move_distance: f32,
    /// Seconds per move step.
    pub move_duration: f32,
    /// Seconds per rotation.
    pub rotate_duration: f32,
    /// Degrees turned by one turn command.
    pub rotation_step_degrees: f32,
    pub pickup_radius: f32,
    /// Seconds between the interact clip starting and the prop search.
    pub pickup_grace: f32,
    /// Smallest allowed angle between actor and prop forward vectors. The
    /// mirror bound `180 - gate` rejects facing the prop's far end.
    pub orientation_gate_degrees: f32,
    /// Heights above the actor's feet of the two obstacle rays.
    pub obstacle_ray_heights: [f32; 2],
    /// Extra reach of the obstacle rays past the move distance.
    pub obstacle_ray_margin: f32,
    /// Mouth anchor in actor-local space.
    pub mouth_anchor: Vec3,
    /// Drop placement in actor-local space, before the carry offset. The
    /// up component rests the prop on the ground rather than half inside it.
    pub drop_offset: Vec3,
    /// Seconds the intro clip plays before idling.
    pub intro_duration: f32,
    /// Seconds between reaching the goal and signalling completion.
    pub goal_delay: f32,
    pub clips: ClipNames,
    pub cues: CueNames,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            move_distance: 1.0,
            move_duration: 0.833,
            rotate_duration: 0.5,
            rotation_step_degrees: 90.0,
            pickup_radius: 1.0,
            pickup_grace: 1.0,
            orientation_gate_degrees: 45.0,
            obstacle_ray_heights: [0.2, 1.0],
            obstacle_ray_margin: 0.1,
            mouth_anchor: Vec3::new(0.0, 0.5, -0.6),
            drop_offset: Vec3::new(0.0, 0.05, -0.3),
            intro_duration: 1.0,
            goal_delay: 1.0,
            clips: ClipNames::default(),
            cues: CueNames::default(),
        }
    }
}

impl ActorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("move_distance", self.move_distance),
            ("move_duration", self.move_duration),
            ("rotate_duration", self.rotate_duration),
            ("pickup_radius", self.pickup_radius),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("pickup_grace", self.pickup_grace),
            ("obstacle_ray_margin", self.obstacle_ray_margin),
            ("intro_duration", self.intro_duration),
            ("goal_delay", self.goal_delay),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if !(0.0..=90.0).contains(&self.orientation_gate_degrees) {
            return Err(ConfigError::GateOutOfRange(self.orientation_gate_degrees));
        }
        Ok(())
    }
}
