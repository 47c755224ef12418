use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaughtObjectState {
    Stacked,
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DroppedObjectAnimation {
    Drop,
    Explode,
}

/// How a dropped entry moves after leaving the plate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropTransform {
    pub animation: DroppedObjectAnimation,
    /// Playfield position at the moment the entry left the plate.
    pub origin: Vec2,
    /// Horizontal plate offset in catcher space, already flipped by facing.
    pub original_x: f32,
}

impl DropTransform {
    pub fn duration(&self) -> f64 {
        match self.animation {
            DroppedObjectAnimation::Drop => DROP_DURATION,
            DroppedObjectAnimation::Explode => EXPLODE_HORIZONTAL_DURATION,
        }
    }

    pub fn position_at(&self, elapsed: f64) -> Vec2 {
        let progress = |duration: f64| (elapsed / duration).clamp(0.0, 1.0);
        match self.animation {
            DroppedObjectAnimation::Drop => {
                let y = DROP_DISTANCE * Easing::InSine.apply(progress(DROP_DURATION)) as f32;
                self.origin + Vec2::new(0.0, y)
            }
            DroppedObjectAnimation::Explode => {
                let y = if elapsed < EXPLODE_RISE_DURATION {
                    -EXPLODE_HEIGHT * Easing::OutSine.apply(progress(EXPLODE_RISE_DURATION)) as f32
                } else {
                    let fall = Easing::InSine
                        .apply((elapsed - EXPLODE_RISE_DURATION) / EXPLODE_FALL_DURATION)
                        as f32;
                    -EXPLODE_HEIGHT + 2.0 * EXPLODE_HEIGHT * fall
                };
                let x = self.original_x
                    * EXPLODE_HORIZONTAL_FACTOR
                    * progress(EXPLODE_HORIZONTAL_DURATION) as f32;
                self.origin + Vec2::new(x, y)
            }
        }
    }

    pub fn alpha_at(&self, elapsed: f64) -> f32 {
        1.0 - (elapsed / DROP_DURATION).clamp(0.0, 1.0) as f32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaughtObjectEntry {
    pub state: CaughtObjectState,
    /// Offset from the plate centre. Y grows downwards, so stacking goes
    /// negative.
    pub position_in_stack: Vec2,
    pub object: PalpableCatchHitObject,
    pub lifetime_start: f64,
    pub transform: Option<DropTransform>,
}

impl CaughtObjectEntry {
    pub fn stacked(object: PalpableCatchHitObject, position_in_stack: Vec2, time: f64) -> Self {
        Self {
            state: CaughtObjectState::Stacked,
            position_in_stack,
            object,
            lifetime_start: time,
            transform: None,
        }
    }

    pub fn lifetime_end(&self) -> f64 {
        self.transform
            .map_or(f64::INFINITY, |transform| self.lifetime_start + transform.duration())
    }

    /// Playfield position of a dropped entry at `time`.
    pub fn dropped_position_at(&self, time: f64) -> Option<Vec2> {
        self.transform
            .map(|transform| transform.position_at(time - self.lifetime_start))
    }
}

/// The objects on the plate and the ones falling off it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CaughtObjectStack {
    stacked: Vec<CaughtObjectEntry>,
    dropped: Vec<CaughtObjectEntry>,
}

impl CaughtObjectStack {
    pub fn stacked(&self) -> &[CaughtObjectEntry] {
        &self.stacked
    }

    pub fn dropped(&self) -> &[CaughtObjectEntry] {
        &self.dropped
    }

    /// Finds a plate position near `position` that keeps clear of every
    /// stacked object. Gives up after [`MAX_STACK_ATTEMPTS`] rounds of jitter
    /// and keeps the last candidate.
    pub fn compute_position_in_stack(
        &self,
        rng: &mut ChaCha8Rng,
        mut position: Vec2,
        display_radius: f32,
    ) -> Vec2 {
        let adjusted_radius = display_radius * STACK_LENIENCE_ADJUST;
        let check_distance = adjusted_radius * adjusted_radius;
        if adjusted_radius <= 0.0 {
            return position;
        }

        let collides = |candidate: Vec2| {
            self.stacked
                .iter()
                .any(|entry| entry.position_in_stack.distance_squared(candidate) < check_distance)
        };

        let mut attempts = 0;
        while collides(position) {
            if attempts == MAX_STACK_ATTEMPTS {
                log::warn!(
                    "No free plate position after {} attempts, stacking at {:?}",
                    attempts,
                    position
                );
                break;
            }
            position.x += rng.random_range(-adjusted_radius..adjusted_radius);
            position.y -= rng.random_range(0.0..STACK_VERTICAL_JITTER);
            attempts += 1;
        }
        position
    }

    pub fn place(&mut self, entry: CaughtObjectEntry) {
        self.stacked.push(entry);
    }

    /// Moves every stacked entry off the plate and returns them as they were
    /// while stacked.
    pub fn clear_plate(
        &mut self,
        animation: DroppedObjectAnimation,
        time: f64,
        catcher_x: f32,
        scale_x: f32,
    ) -> Vec<CaughtObjectEntry> {
        let cleared = std::mem::take(&mut self.stacked);
        for entry in &cleared {
            let flipped_x = entry.position_in_stack.x * scale_x.signum();
            let transform = DropTransform {
                animation,
                origin: Vec2::new(catcher_x + flipped_x, entry.position_in_stack.y),
                original_x: entry.position_in_stack.x * scale_x,
            };
            self.dropped.push(CaughtObjectEntry {
                state: CaughtObjectState::Dropped,
                lifetime_start: time,
                transform: Some(transform),
                ..entry.clone()
            });
        }
        log::trace!("{:?} {} objects at {}", animation, cleared.len(), time);
        cleared
    }

    /// Removes every stacked and dropped entry of the object with `id`.
    pub fn remove_object(&mut self, id: usize) {
        self.stacked.retain(|entry| entry.object.id != id);
        self.dropped.retain(|entry| entry.object.id != id);
    }

    /// Puts previously cleared entries back on the plate.
    pub fn restore(&mut self, entries: &[CaughtObjectEntry]) {
        for entry in entries {
            self.dropped.retain(|dropped| dropped.object.id != entry.object.id);
            self.stacked.push(entry.clone());
        }
    }

    pub fn expire(&mut self, time: f64) {
        self.dropped.retain(|entry| entry.lifetime_end() > time);
    }
}
