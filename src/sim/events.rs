//! Game events and ordered listener lists

use serde::Serialize;

use super::state::EntityId;

/// A ball touched another entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HitEvent {
    pub ball: EntityId,
    pub target: EntityId,
}

/// Everything a tick can report to the outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    BallHit(HitEvent),
    TargetDestroyed { target: EntityId },
    KillZoneEntered { ball: EntityId },
    LevelCleared,
}

/// Listener callback
pub type Listener<E> = Box<dyn FnMut(&E)>;

/// Synchronous listener list; listeners run in registration order
pub struct EventStream<E> {
    listeners: Vec<Listener<E>>,
}

impl<E> Default for EventStream<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }
}

impl<E> EventStream<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&E) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&mut self, event: &E) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> std::fmt::Debug for EventStream<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_listeners_fire_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stream = EventStream::new();
        for tag in ["first", "second", "third"] {
            let log = log.clone();
            stream.add_listener(move |e: &u32| log.borrow_mut().push((tag, *e)));
        }
        stream.publish(&7);
        stream.publish(&8);
        assert_eq!(
            *log.borrow(),
            [
                ("first", 7),
                ("second", 7),
                ("third", 7),
                ("first", 8),
                ("second", 8),
                ("third", 8)
            ]
        );
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_publish_without_listeners() {
        let mut stream: EventStream<GameEvent> = EventStream::new();
        assert!(stream.is_empty());
        stream.publish(&GameEvent::LevelCleared);
    }
}
