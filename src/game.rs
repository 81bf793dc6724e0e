//! Tick driver with event listeners
//!
//! Owns the game state and settings, runs ticks and forwards each tick's
//! events to the registered listeners in order.

use crate::error::GameError;
use crate::settings::Settings;
use crate::sim::{
    EventStream, GameEvent, GamePhase, GameState, MarchLimits, TickInput, generate_level, tick,
};

/// A running breakout game
#[derive(Debug)]
pub struct Game {
    state: GameState,
    settings: Settings,
    limits: MarchLimits,
    events: EventStream<GameEvent>,
}

impl Game {
    /// Start a fresh level
    ///
    /// Fails on invalid settings before anything is built.
    pub fn new(settings: Settings) -> Result<Self, GameError> {
        settings.validate()?;
        let state = generate_level(&settings)?;
        Ok(Self {
            state,
            limits: settings.march_limits(),
            settings,
            events: EventStream::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register a listener; listeners run in registration order
    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.events.add_listener(listener);
    }

    /// Run one tick and publish what happened
    ///
    /// The published events are also returned.
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input, &self.limits);
        let events = self.state.drain_events();
        for event in &events {
            self.events.publish(event);
        }
        events
    }

    /// The level ended, cleared or missed
    pub fn is_over(&self) -> bool {
        self.state.phase != GamePhase::Playing
    }

    /// Restart the level, keeping listeners
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.state = generate_level(&self.settings)?;
        Ok(())
    }
}
