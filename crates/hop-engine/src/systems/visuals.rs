//! Per-frame visual timers of knocked-away objects.

use glam::Vec2;

use crate::components::body::KinematicBody;
use crate::components::state::{DespawnReason, KnockAwayType, ObjectState, StepOutcome};

/// Spin (optionally about the sprite centre) and fade knocked-away objects.
pub fn tick(body: &mut KinematicBody, dt: f32) -> StepOutcome {
    if body.state != ObjectState::KnockedAway {
        return StepOutcome::Continue;
    }

    if body.knock_away_type == KnockAwayType::Rotate {
        let degrees = body.config.knock_away_rotation_speed * dt;
        if body.config.rotate_around_center {
            if let Some(offset) = body.appearance.sprite_center_offset {
                let turned = Vec2::from_angle(degrees.to_radians()).rotate(offset);
                body.pos += offset - turned;
                body.appearance.sprite_center_offset = Some(turned);
            }
        }
        body.appearance.rotation += degrees;
    }

    if let Some(seconds) = body.appearance.fade_time {
        body.appearance.alpha -= dt / seconds;
        if body.appearance.alpha <= 0.0 {
            body.appearance.alpha = 0.0;
            log::debug!("{:?} faded out", body.id);
            return StepOutcome::Despawn(DespawnReason::FadedOut);
        }
    }
    StepOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::collaborators::Collaborators;
    use crate::api::types::EntityId;
    use crate::components::config::PhysicsConfig;
    use crate::systems::motion::knock_away;

    fn knocked(config: PhysicsConfig) -> KinematicBody {
        let mut body = KinematicBody::new(EntityId(1), Vec2::ZERO, config);
        knock_away(&mut body, &Collaborators::default(), true, false, None, None);
        body
    }

    #[test]
    fn rotate_type_spins_every_frame() {
        let config = PhysicsConfig::default().with_knock_away(KnockAwayType::Rotate, Vec2::new(5.0, 5.0));
        let mut body = knocked(config);
        tick(&mut body, 0.5);
        tick(&mut body, 0.5);
        assert!((body.appearance().rotation - 10.0).abs() < 1e-5);
        assert_eq!(body.position(), Vec2::ZERO);
    }

    #[test]
    fn centred_rotation_moves_the_pivot_offset() {
        let mut config = PhysicsConfig::default().with_knock_away(KnockAwayType::Rotate, Vec2::ZERO);
        config.rotate_around_center = true;
        config.knock_away_rotation_speed = 180.0;
        let mut body = KinematicBody::new(EntityId(1), Vec2::ZERO, config);
        body.appearance.sprite_center_offset = Some(Vec2::new(0.0, 1.0));
        knock_away(&mut body, &Collaborators::default(), true, false, None, None);
        tick(&mut body, 1.0);
        // Half a turn about (0, 1) lands the origin on (0, 2).
        assert!((body.position() - Vec2::new(0.0, 2.0)).length() < 1e-4);
    }

    #[test]
    fn fade_despawns_when_transparent() {
        let config = PhysicsConfig::default().with_disappear_time(1.0);
        let mut body = knocked(config);
        assert_eq!(tick(&mut body, 0.6), StepOutcome::Continue);
        assert_eq!(tick(&mut body, 0.6), StepOutcome::Despawn(DespawnReason::FadedOut));
    }

    #[test]
    fn no_sprite_means_no_fade() {
        let config = PhysicsConfig::default().with_disappear_time(1.0);
        let mut body = KinematicBody::new(EntityId(1), Vec2::ZERO, config);
        body.appearance.sprite_center_offset = None;
        knock_away(&mut body, &Collaborators::default(), true, false, None, None);
        assert_eq!(tick(&mut body, 5.0), StepOutcome::Continue);
        assert_eq!(body.appearance().alpha, 1.0);
    }
}
