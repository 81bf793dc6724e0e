//! Game state and core simulation types

use serde::Serialize;

use super::collision::{Collidable, Scene};
use super::events::{GameEvent, HitEvent};
use super::sdf::Transform;
use crate::Vec2D;

/// Entity handle, unique within one [`GameState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(pub u32);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role of an entity in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    /// Marches through the scene and bounces
    Ball,
    /// Player-controlled, follows the pointer horizontally
    Bar,
    /// Static boundary
    Wall,
    /// Ends the run when touched
    KillZone,
    /// Destroyed when touched
    Target,
}

/// Anything placed in the arena
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// World placement of the entity's shape
    pub shape: Transform,
    /// Displacement per tick
    pub velocity: Vec2D,
}

impl Entity {
    #[inline]
    pub fn position(&self) -> Vec2D {
        self.shape.translate
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every target destroyed
    Cleared,
    /// A ball reached the kill zone
    Missed,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Arena size (width, height)
    pub arena: Vec2D,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Live entities (sorted by id)
    pub entities: Vec<Entity>,
    /// Targets still standing
    pub targets_remaining: u32,
    /// Events produced since the last drain
    #[serde(skip)]
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an empty arena
    pub fn new(arena: Vec2D) -> Self {
        Self {
            arena,
            phase: GamePhase::Playing,
            time_ticks: 0,
            entities: Vec::new(),
            targets_remaining: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity and return its id
    pub fn spawn(&mut self, kind: EntityKind, shape: Transform, velocity: Vec2D) -> EntityId {
        let id = self.next_entity_id();
        if kind == EntityKind::Target {
            self.targets_remaining += 1;
        }
        self.entities.push(Entity {
            id,
            kind,
            shape,
            velocity,
        });
        id
    }

    /// Remove an entity; `None` if it is already gone
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        let entity = self.entities.remove(index);
        if entity.kind == EntityKind::Target {
            self.targets_remaining = self.targets_remaining.saturating_sub(1);
        }
        Some(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Ids of every entity of `kind`, in id order
    pub fn ids_of(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}

impl Scene for GameState {
    fn collidables(&self) -> impl Iterator<Item = Collidable<'_>> {
        self.entities.iter().map(|e| Collidable {
            id: e.id,
            shape: &e.shape,
            velocity: e.velocity,
        })
    }

    fn on_hit(&mut self, hit: HitEvent) {
        self.events.push(GameEvent::BallHit(hit));
        let Some(kind) = self.entity(hit.target).map(|e| e.kind) else {
            return;
        };
        log::debug!("Ball {} hit {:?} {}", hit.ball, kind, hit.target);

        match kind {
            EntityKind::Target => {
                self.despawn(hit.target);
                self.events.push(GameEvent::TargetDestroyed { target: hit.target });
                if self.targets_remaining == 0 && self.phase == GamePhase::Playing {
                    log::info!("All targets destroyed at tick {}", self.time_ticks);
                    self.phase = GamePhase::Cleared;
                    self.events.push(GameEvent::LevelCleared);
                }
            }
            EntityKind::KillZone => {
                self.events.push(GameEvent::KillZoneEntered { ball: hit.ball });
                if self.phase == GamePhase::Playing {
                    log::info!("Ball {} missed at tick {}", hit.ball, self.time_ticks);
                    self.phase = GamePhase::Missed;
                }
            }
            EntityKind::Ball | EntityKind::Bar | EntityKind::Wall => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sdf::{Circle, Rect};

    fn at(x: f64, y: f64) -> Transform {
        Transform::new(Rect::new(Vec2D::new(30.0, 30.0)), 1.0, 0.0, Vec2D::new(x, y)).unwrap()
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut state = GameState::new(Vec2D::new(100.0, 100.0));
        let a = state.spawn(EntityKind::Wall, at(0.0, 0.0), Vec2D::ZERO);
        let b = state.spawn(EntityKind::Wall, at(50.0, 0.0), Vec2D::ZERO);
        state.despawn(a);
        let c = state.spawn(EntityKind::Wall, at(80.0, 0.0), Vec2D::ZERO);
        assert!(a < b && b < c);
        assert_eq!(state.entities.len(), 2);
    }

    #[test]
    fn test_target_hit_removes_target() {
        let mut state = GameState::new(Vec2D::new(100.0, 100.0));
        let ball = state.spawn(
            EntityKind::Ball,
            Transform::new(Circle, 5.0, 0.0, Vec2D::ZERO).unwrap(),
            Vec2D::new(1.0, 2.0),
        );
        let t1 = state.spawn(EntityKind::Target, at(20.0, 20.0), Vec2D::ZERO);
        let t2 = state.spawn(EntityKind::Target, at(60.0, 20.0), Vec2D::ZERO);
        assert_eq!(state.targets_remaining, 2);

        state.on_hit(HitEvent { ball, target: t1 });
        assert!(state.entity(t1).is_none());
        assert_eq!(state.targets_remaining, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(
            state.drain_events(),
            [
                GameEvent::BallHit(HitEvent { ball, target: t1 }),
                GameEvent::TargetDestroyed { target: t1 }
            ]
        );

        state.on_hit(HitEvent { ball, target: t2 });
        assert_eq!(state.phase, GamePhase::Cleared);
        assert_eq!(state.drain_events().last(), Some(&GameEvent::LevelCleared));
    }

    #[test]
    fn test_kill_zone_hit_misses() {
        let mut state = GameState::new(Vec2D::new(100.0, 100.0));
        let ball = state.spawn(
            EntityKind::Ball,
            Transform::new(Circle, 5.0, 0.0, Vec2D::ZERO).unwrap(),
            Vec2D::ZERO,
        );
        let zone = state.spawn(EntityKind::KillZone, at(50.0, 0.0), Vec2D::ZERO);
        state.on_hit(HitEvent { ball, target: zone });
        assert_eq!(state.phase, GamePhase::Missed);
        assert!(state.entity(zone).is_some());
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::KillZoneEntered { ball })
        );
    }

    #[test]
    fn test_wall_hit_only_records() {
        let mut state = GameState::new(Vec2D::new(100.0, 100.0));
        let wall = state.spawn(EntityKind::Wall, at(0.0, 0.0), Vec2D::ZERO);
        let hit = HitEvent {
            ball: EntityId(42),
            target: wall,
        };
        state.on_hit(hit);
        assert_eq!(state.drain_events(), [GameEvent::BallHit(hit)]);
        assert!(state.drain_events().is_empty());
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn test_collidables_mirror_entities() {
        let mut state = GameState::new(Vec2D::new(100.0, 100.0));
        let wall = state.spawn(EntityKind::Wall, at(0.0, 0.0), Vec2D::ZERO);
        let bar = state.spawn(EntityKind::Bar, at(50.0, 10.0), Vec2D::new(-4.0, 0.0));

        let query = Vec2D::new(50.0, 40.0);
        let seen: Vec<_> = state
            .collidables()
            .map(|c| (c.id, c.velocity, c.shape.distance(query)))
            .collect();
        assert_eq!(seen.len(), 2);
        assert_eq!((seen[0].0, seen[0].1), (wall, Vec2D::ZERO));
        assert!((seen[0].2 - 1850f64.sqrt()).abs() < 1e-9);
        assert_eq!((seen[1].0, seen[1].1), (bar, Vec2D::new(-4.0, 0.0)));
        assert!((seen[1].2 - 15.0).abs() < 1e-9);
    }
}
