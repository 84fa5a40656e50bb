//! Entity registry
//!
//! Owns one collection per entity kind. Removal is always by id after a pass
//! has finished reading, so a pass never sees a collection shift under it.

use serde::Serialize;

use super::powerup::{HealthPowerUp, TimedPowerUp};
use super::state::{Asteroid, Explosion, Shot};

/// Anything stored in the registry
pub trait Entity {
    fn id(&self) -> u32;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(impl Entity for $ty {
            fn id(&self) -> u32 {
                self.id
            }
        })*
    };
}

impl_entity!(Asteroid, Shot, Explosion, HealthPowerUp, TimedPowerUp);

/// Live entities of one kind, kept in spawn order
#[derive(Debug, Clone, Serialize)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn insert(&mut self, item: T) {
        self.items.push(item);
    }

    /// Ids of every entity matching `pred`, in spawn order
    pub fn ids_where(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<u32> {
        self.items
            .iter()
            .filter(|item| pred(item))
            .map(|item| item.id())
            .collect()
    }

    /// Remove the given ids and hand the entities back, in spawn order.
    /// Unknown ids are ignored.
    pub(crate) fn remove(&mut self, ids: &[u32]) -> Vec<T> {
        if ids.is_empty() {
            return Vec::new();
        }
        let (removed, kept): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| ids.contains(&item.id()));
        self.items = kept;
        removed
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

/// Owner of every live entity
#[derive(Debug, Clone, Serialize)]
pub struct Registry {
    #[serde(skip)]
    next_id: u32,
    #[serde(skip)]
    max_asteroids: usize,
    asteroids: Collection<Asteroid>,
    shots: Collection<Shot>,
    health_power_ups: Collection<HealthPowerUp>,
    timed_power_ups: Collection<TimedPowerUp>,
    explosions: Collection<Explosion>,
}

impl Registry {
    pub fn new(max_asteroids: usize) -> Self {
        Self {
            next_id: 1,
            max_asteroids,
            asteroids: Collection::default(),
            shots: Collection::default(),
            health_power_ups: Collection::default(),
            timed_power_ups: Collection::default(),
            explosions: Collection::default(),
        }
    }

    /// Allocate a new entity ID. Ids are never reused.
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn max_asteroids(&self) -> usize {
        self.max_asteroids
    }

    pub fn can_spawn_asteroid(&self) -> bool {
        self.asteroids.len() < self.max_asteroids
    }

    /// Insert an asteroid unless the cap is reached
    pub(crate) fn insert_asteroid(&mut self, asteroid: Asteroid) -> bool {
        if !self.can_spawn_asteroid() {
            log::warn!("Asteroid cap reached, dropping asteroid {}", asteroid.id);
            return false;
        }
        self.asteroids.insert(asteroid);
        true
    }

    pub fn asteroids(&self) -> &Collection<Asteroid> {
        &self.asteroids
    }

    pub fn shots(&self) -> &Collection<Shot> {
        &self.shots
    }

    pub fn health_power_ups(&self) -> &Collection<HealthPowerUp> {
        &self.health_power_ups
    }

    pub fn timed_power_ups(&self) -> &Collection<TimedPowerUp> {
        &self.timed_power_ups
    }

    pub fn explosions(&self) -> &Collection<Explosion> {
        &self.explosions
    }

    pub(crate) fn asteroids_mut(&mut self) -> &mut Collection<Asteroid> {
        &mut self.asteroids
    }

    pub(crate) fn shots_mut(&mut self) -> &mut Collection<Shot> {
        &mut self.shots
    }

    pub(crate) fn health_power_ups_mut(&mut self) -> &mut Collection<HealthPowerUp> {
        &mut self.health_power_ups
    }

    pub(crate) fn timed_power_ups_mut(&mut self) -> &mut Collection<TimedPowerUp> {
        &mut self.timed_power_ups
    }

    pub(crate) fn explosions_mut(&mut self) -> &mut Collection<Explosion> {
        &mut self.explosions
    }

    /// Split borrow for the shot/asteroid pass
    pub(crate) fn shots_and_asteroids_mut(
        &mut self,
    ) -> (&mut Collection<Shot>, &mut Collection<Asteroid>) {
        (&mut self.shots, &mut self.asteroids)
    }

    /// Total live entities across all kinds
    pub fn len(&self) -> usize {
        self.asteroids.len()
            + self.shots.len()
            + self.health_power_ups.len()
            + self.timed_power_ups.len()
            + self.explosions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entity (session restart)
    pub(crate) fn clear(&mut self) {
        self.asteroids.clear();
        self.shots.clear();
        self.health_power_ups.clear();
        self.timed_power_ups.clear();
        self.explosions.clear();
    }
}
