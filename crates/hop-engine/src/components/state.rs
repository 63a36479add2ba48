use serde::{Deserialize, Serialize};

/// Physical phase of an object. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectState {
    #[default]
    Falling,
    Grounded,
    KnockedAway,
    OnLava,
}

/// Whether and how an object moves, independent of [`ObjectState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementMode {
    /// Integrator disabled.
    Still,
    #[default]
    Sliding,
    Bouncing,
    /// Moves like `Sliding`; reserved for entities driving themselves through hooks.
    Special,
}

/// Visual policy applied when an object is knocked away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnockAwayType {
    /// Flip the sprite upside down.
    #[default]
    Flip,
    /// Spin continuously.
    Rotate,
    /// Hand over to an animation; the object stops simulating itself.
    Animation,
}

/// Which scheduler tick drives integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    #[default]
    FixedStep,
    /// Fixed steps, rendered through the interpolation backend.
    Interpolated,
    PerFrame,
}

/// How a thrown object looks in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrowVisual {
    #[default]
    Normal,
    RotateSprite,
}

/// Result of one update of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Despawn(DespawnReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DespawnReason {
    /// Sank below the lava surface.
    Submerged,
    /// Knock-away fade finished.
    FadedOut,
    /// Knocked away and no longer on screen.
    LeftView,
}
