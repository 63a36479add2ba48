//! Outside systems the physics core reports to.
//!
//! Each object receives a [`Collaborators`] bundle at construction instead of
//! reaching for global managers. The default bundle discards everything.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use super::types::{EntityId, SoundEvent};

/// Chain-scoring bookkeeping for thrown objects (shell combos).
pub trait ComboTracker {
    /// A thrown object started moving; begin a fresh chain.
    fn start_shell_chain(&self);
    /// The thrown object landed; the chain is over.
    fn end_shell_chain(&self);
    /// `victim` was knocked away by a thrown object.
    fn register_shell_kill(&self, victim: EntityId);
}

/// Fire-and-forget audio/animation requests.
pub trait Presentation {
    fn play_sound(&self, source: EntityId, sound: SoundEvent);
    fn trigger_animation(&self, source: EntityId, trigger: &str);
}

/// Collaborator that ignores every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ComboTracker for Silent {
    fn start_shell_chain(&self) {}
    fn end_shell_chain(&self) {}
    fn register_shell_kill(&self, _victim: EntityId) {}
}

impl Presentation for Silent {
    fn play_sound(&self, _source: EntityId, _sound: SoundEvent) {}
    fn trigger_animation(&self, _source: EntityId, _trigger: &str) {}
}

/// Handles to the collaborators an object talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub combo: Rc<dyn ComboTracker>,
    pub presentation: Rc<dyn Presentation>,
}

impl Collaborators {
    pub fn new(combo: Rc<dyn ComboTracker>, presentation: Rc<dyn Presentation>) -> Self {
        Self { combo, presentation }
    }

    /// Bundle backed by a shared [`EventLog`], returned alongside for inspection.
    pub fn recording() -> (Self, Rc<EventLog>) {
        let log = Rc::new(EventLog::default());
        let collab = Self {
            combo: log.clone(),
            presentation: log.clone(),
        };
        (collab, log)
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            combo: Rc::new(Silent),
            presentation: Rc::new(Silent),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Something an object asked of its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorEvent {
    ShellChainStarted,
    ShellChainEnded,
    ShellKill(EntityId),
    Sound(EntityId, SoundEvent),
    Animation(EntityId, String),
}

/// Records every collaborator call in order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<CollaboratorEvent>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<CollaboratorEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: &CollaboratorEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == event).count()
    }

    pub fn drain(&self) -> Vec<CollaboratorEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn push(&self, event: CollaboratorEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl ComboTracker for EventLog {
    fn start_shell_chain(&self) {
        self.push(CollaboratorEvent::ShellChainStarted);
    }

    fn end_shell_chain(&self) {
        self.push(CollaboratorEvent::ShellChainEnded);
    }

    fn register_shell_kill(&self, victim: EntityId) {
        self.push(CollaboratorEvent::ShellKill(victim));
    }
}

impl Presentation for EventLog {
    fn play_sound(&self, source: EntityId, sound: SoundEvent) {
        self.push(CollaboratorEvent::Sound(source, sound));
    }

    fn trigger_animation(&self, source: EntityId, trigger: &str) {
        self.push(CollaboratorEvent::Animation(source, trigger.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_bundle_shares_one_log() {
        let (collab, log) = Collaborators::recording();
        collab.combo.start_shell_chain();
        collab.presentation.play_sound(EntityId(3), SoundEvent(7));
        collab.combo.register_shell_kill(EntityId(4));

        assert_eq!(
            log.events(),
            vec![
                CollaboratorEvent::ShellChainStarted,
                CollaboratorEvent::Sound(EntityId(3), SoundEvent(7)),
                CollaboratorEvent::ShellKill(EntityId(4)),
            ]
        );
    }

    #[test]
    fn drain_empties_the_log() {
        let (collab, log) = Collaborators::recording();
        collab.combo.end_shell_chain();
        assert_eq!(log.drain().len(), 1);
        assert!(log.events().is_empty());
    }

    #[test]
    fn default_bundle_is_silent() {
        let collab = Collaborators::default();
        collab.combo.end_shell_chain();
        collab.presentation.trigger_animation(EntityId(1), "anything");
    }
}
