//! Platform attachment: which anchor an object hangs under.

use serde::Serialize;

use crate::api::types::EntityId;
use crate::core::query::ColliderRecord;

/// Desired parent of an object, mirrored into the parent graph after each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformLink {
    /// Parent captured at init; restored whenever the object leaves a platform.
    pub original_parent: Option<EntityId>,
    /// Moving platform the object is standing on.
    pub platform: Option<EntityId>,
    /// Whoever is holding the object.
    pub carrier: Option<EntityId>,
}

impl PlatformLink {
    pub fn new(original_parent: Option<EntityId>) -> Self {
        Self {
            original_parent,
            platform: None,
            carrier: None,
        }
    }

    /// Effective parent: carrier, then platform, then the original parent.
    pub fn parent(&self) -> Option<EntityId> {
        self.carrier.or(self.platform).or(self.original_parent)
    }

    pub fn on_moving_platform(&self) -> bool {
        self.platform.is_some()
    }

    pub fn attach(&mut self, platform: EntityId) {
        if self.platform != Some(platform) {
            log::debug!("attached to platform {:?}", platform);
        }
        self.platform = Some(platform);
    }

    /// Undo platform attachment.
    pub fn restore(&mut self) {
        if let Some(platform) = self.platform.take() {
            log::debug!("detached from platform {:?}", platform);
        }
    }

    /// Attach to `surface` if it is a moving platform owned by an anchor, otherwise detach.
    pub fn settle_on(&mut self, surface: &ColliderRecord) {
        match (surface.is_moving_platform(), surface.entity) {
            (true, Some(anchor)) => self.attach(anchor),
            _ => self.restore(),
        }
    }
}
