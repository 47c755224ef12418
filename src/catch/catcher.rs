use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum CatcherAnimationState {
    #[default]
    Idle,
    Kiai,
    Fail,
}

/// Transitions the host reacts to, such as tinting the catcher while it
/// hyper-dashes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CatcherEvent {
    HyperDashStarted { direction: i32 },
    HyperDashEnded,
}

/// `modifier <= 1` if and only if `direction == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HyperDashState {
    pub modifier: f64,
    pub direction: i32,
    pub target_x: f32,
}

impl Default for HyperDashState {
    fn default() -> Self {
        Self {
            modifier: 1.0,
            direction: 0,
            target_x: -1.0,
        }
    }
}

impl HyperDashState {
    pub fn active(&self) -> bool {
        self.modifier > 1.0
    }

    fn is_consistent(&self) -> bool {
        self.modifier.is_finite() && self.active() == (self.direction != 0)
    }
}

/// Catcher state captured right before a judgement was applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatcherSnapshot {
    pub animation_state: CatcherAnimationState,
    pub hyper_dash: HyperDashState,
}

impl CatcherSnapshot {
    pub fn hyper_dashing(&self) -> bool {
        self.hyper_dash.active()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchJudgementResult {
    pub object: PalpableCatchHitObject,
    pub is_hit: bool,
    pub time_absolute: f64,
    /// Filled in when the result is applied.
    pub snapshot: Option<CatcherSnapshot>,
    /// Plate entries this result cleared, as they were while stacked.
    pub cleared: Vec<CaughtObjectEntry>,
}

impl CatchJudgementResult {
    pub fn new(object: PalpableCatchHitObject, is_hit: bool, time_absolute: f64) -> Self {
        Self {
            object,
            is_hit,
            time_absolute,
            snapshot: None,
            cleared: Vec::new(),
        }
    }
}

/// Catcher and object scale for a circle size.
pub fn calculate_scale(circle_size: f32) -> f32 {
    1.0 - 0.7 * (circle_size - 5.0) / 5.0
}

pub fn calculate_catch_width(scale: Vec2) -> f32 {
    CATCHER_BASE_SIZE * scale.x.abs() * ALLOWED_CATCH_RANGE
}

pub fn catch_width_for_difficulty(difficulty: &BeatmapDifficulty) -> f32 {
    calculate_catch_width(Vec2::splat(calculate_scale(difficulty.circle_size)))
}

/// Whether `object_x` lies within half of `catch_width` of `catcher_x`,
/// edges included.
pub fn catch_range_contains(catcher_x: f32, catch_width: f32, object_x: f32) -> bool {
    let half_width = catch_width / 2.0;
    object_x >= catcher_x - half_width && object_x <= catcher_x + half_width
}

/// The catcher at the bottom of the playfield.
#[derive(Debug, Clone)]
pub struct Catcher {
    x: f32,
    scale: Vec2,
    catch_width: f32,
    current_state: CatcherAnimationState,
    dashing: bool,
    hyper_dash: HyperDashState,
    time: f64,
    stack: CaughtObjectStack,
    rng: ChaCha8Rng,
    events: Vec<CatcherEvent>,
}

impl Catcher {
    pub fn new(difficulty: &BeatmapDifficulty, seed: u64) -> Self {
        let scale = Vec2::splat(calculate_scale(difficulty.circle_size));
        Self {
            x: CATCH_PLAYFIELD_CENTRE,
            scale,
            catch_width: calculate_catch_width(scale),
            current_state: CatcherAnimationState::Idle,
            dashing: false,
            hyper_dash: HyperDashState::default(),
            time: 0.0,
            stack: CaughtObjectStack::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn catch_width(&self) -> f32 {
        self.catch_width
    }

    pub fn current_state(&self) -> CatcherAnimationState {
        self.current_state
    }

    pub fn dashing(&self) -> bool {
        self.dashing
    }

    pub fn set_dashing(&mut self, dashing: bool) {
        self.dashing = dashing;
    }

    pub fn hyper_dash(&self) -> HyperDashState {
        self.hyper_dash
    }

    pub fn hyper_dashing(&self) -> bool {
        self.hyper_dash.active()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn stack(&self) -> &CaughtObjectStack {
        &self.stack
    }

    pub fn take_events(&mut self) -> Vec<CatcherEvent> {
        std::mem::take(&mut self.events)
    }

    /// Movement per millisecond, before direction.
    pub fn speed(&self) -> f64 {
        let dash_modifier = if self.dashing { 1.0 } else { 0.5 };
        BASE_DASH_SPEED * dash_modifier * self.hyper_dash.modifier
    }

    pub fn can_catch(&self, object: &CatchHitObject) -> bool {
        object
            .as_palpable()
            .is_some_and(|palpable| self.can_catch_palpable(palpable))
    }

    pub fn can_catch_palpable(&self, object: &PalpableCatchHitObject) -> bool {
        catch_range_contains(self.x, self.catch_width, object.effective_x())
    }

    pub fn update_position(&mut self, position: f32) {
        let position = position.clamp(0.0, CATCH_PLAYFIELD_WIDTH);
        if position == self.x {
            return;
        }
        let facing = if position > self.x { 1.0 } else { -1.0 };
        self.scale.x = self.scale.x.abs() * facing;
        self.x = position;
    }

    /// Advances the simulation by `elapsed` ms while moving in `direction`
    /// (-1, 0 or 1).
    pub fn update(&mut self, elapsed: f64, direction: i32) {
        if direction != 0 && elapsed > 0.0 {
            let delta = direction as f64 * self.speed() * elapsed;
            self.update_position((self.x as f64 + delta) as f32);
        }

        let overshot = (self.hyper_dash.direction > 0 && self.hyper_dash.target_x < self.x)
            || (self.hyper_dash.direction < 0 && self.hyper_dash.target_x > self.x);
        if overshot {
            self.x = self.hyper_dash.target_x;
            self.set_hyper_dash_state(1.0, -1.0);
        }

        self.time += elapsed.max(0.0);
        self.stack.expire(self.time);
    }

    /// Starts a hyper-dash towards `target_x`, or cancels it when `modifier`
    /// is not above 1.
    pub fn set_hyper_dash_state(&mut self, modifier: f64, target_x: f32) {
        let was_hyper_dashing = self.hyper_dashing();

        self.hyper_dash = if modifier <= 1.0 || self.x == target_x {
            HyperDashState {
                target_x,
                ..HyperDashState::default()
            }
        } else {
            HyperDashState {
                modifier,
                direction: if target_x > self.x { 1 } else { -1 },
                target_x,
            }
        };

        match (was_hyper_dashing, self.hyper_dashing()) {
            (false, true) => {
                log::trace!("Hyper-dash towards {} at {}", target_x, self.time);
                self.events.push(CatcherEvent::HyperDashStarted {
                    direction: self.hyper_dash.direction,
                })
            }
            (true, false) => self.events.push(CatcherEvent::HyperDashEnded),
            _ => {}
        }

        debug_assert!(
            self.hyper_dash.is_consistent(),
            "inconsistent hyper-dash state {:?}",
            self.hyper_dash
        );
    }

    pub fn snapshot(&self) -> CatcherSnapshot {
        CatcherSnapshot {
            animation_state: self.current_state,
            hyper_dash: self.hyper_dash,
        }
    }

    /// Applies a judgement. The state needed to undo it is stored on
    /// `result`.
    pub fn on_new_result(&mut self, result: &mut CatchJudgementResult) {
        result.snapshot = Some(self.snapshot());
        let object = &result.object;

        if result.is_hit {
            let display_radius = CATCH_OBJECT_RADIUS * self.scale.y.abs();
            let ideal = Vec2::new(object.effective_x() - self.x, 0.0);
            let position =
                self.stack
                    .compute_position_in_stack(&mut self.rng, ideal, display_radius);
            self.stack.place(CaughtObjectEntry::stacked(
                object.clone(),
                position,
                result.time_absolute,
            ));
        }

        // Tiny droplets never touch the catcher state.
        if object.kind == PalpableKind::TinyDroplet {
            return;
        }

        match (result.is_hit, object.hyper_dash_target) {
            (true, Some(target)) => {
                let time_difference = target.start_time - object.start_time;
                let position_difference = (target.effective_x - self.x) as f64;
                let velocity =
                    position_difference / (time_difference - HYPER_DASH_FRAME_TIME).max(1.0);
                self.set_hyper_dash_state(velocity.abs() / BASE_DASH_SPEED, target.effective_x);
            }
            _ => self.set_hyper_dash_state(1.0, -1.0),
        }

        if result.is_hit {
            self.current_state = if object.kiai {
                CatcherAnimationState::Kiai
            } else {
                CatcherAnimationState::Idle
            };
        } else if !object.is_banana() {
            self.current_state = CatcherAnimationState::Fail;
        }
    }

    /// Undoes [`Catcher::on_new_result`] for `result`.
    pub fn on_revert_result(&mut self, result: &CatchJudgementResult) {
        if let Some(snapshot) = result.snapshot {
            self.current_state = snapshot.animation_state;
            if self.hyper_dashing() != snapshot.hyper_dashing() {
                self.events.push(if snapshot.hyper_dashing() {
                    CatcherEvent::HyperDashStarted {
                        direction: snapshot.hyper_dash.direction,
                    }
                } else {
                    CatcherEvent::HyperDashEnded
                });
            }
            self.hyper_dash = snapshot.hyper_dash;
        }

        self.stack.remove_object(result.object.id);
        let restored: Vec<CaughtObjectEntry> = result
            .cleared
            .iter()
            .filter(|entry| entry.object.id != result.object.id)
            .cloned()
            .collect();
        self.stack.restore(&restored);
    }

    /// Throws everything on the plate off it, returning what was there.
    pub fn clear_plate(
        &mut self,
        animation: DroppedObjectAnimation,
        time: f64,
    ) -> Vec<CaughtObjectEntry> {
        self.stack.clear_plate(animation, time, self.x, self.scale.x)
    }

    pub fn drop_all(&mut self, time: f64) -> Vec<CaughtObjectEntry> {
        self.clear_plate(DroppedObjectAnimation::Drop, time)
    }

    pub fn explode(&mut self, time: f64) -> Vec<CaughtObjectEntry> {
        self.clear_plate(DroppedObjectAnimation::Explode, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catcher() -> Catcher {
        Catcher::new(&BeatmapDifficulty::default(), 0)
    }

    #[test]
    fn test_scale_and_width_follow_circle_size() {
        assert_eq!(calculate_scale(5.0), 1.0);
        assert!((calculate_scale(10.0) - 0.3).abs() < 1e-6);
        assert!((calculate_catch_width(Vec2::ONE) - 85.4).abs() < 1e-4);
        assert_eq!(
            calculate_catch_width(Vec2::new(-1.0, 1.0)),
            calculate_catch_width(Vec2::ONE)
        );
    }

    #[test]
    fn test_catch_range_is_inclusive() {
        assert!(catch_range_contains(100.0, 1.0, 100.5));
        assert!(catch_range_contains(100.0, 1.0, 99.5));
        assert!(!catch_range_contains(100.0, 1.0, 101.5));
    }

    #[test]
    fn test_non_palpable_objects_are_never_caught() {
        let catcher = catcher();
        let stream = CatchHitObject::JuiceStream {
            start_time: 0.0,
            nested: vec![],
        };
        assert!(!catcher.can_catch(&stream));
        let fruit = CatchHitObject::Palpable(PalpableCatchHitObject::fruit(0, 0.0, 256.0));
        assert!(catcher.can_catch(&fruit));
    }

    #[test]
    fn test_update_position_clamps_and_faces() {
        let mut catcher = catcher();
        catcher.update_position(100.0);
        assert_eq!(catcher.x(), 100.0);
        assert!(catcher.scale().x < 0.0);
        catcher.update_position(1000.0);
        assert_eq!(catcher.x(), CATCH_PLAYFIELD_WIDTH);
        assert!(catcher.scale().x > 0.0);
    }

    #[test]
    fn test_walk_and_dash_speeds() {
        let mut catcher = catcher();
        catcher.update(100.0, 1);
        assert_eq!(catcher.x(), 306.0);
        catcher.set_dashing(true);
        catcher.update(100.0, -1);
        assert_eq!(catcher.x(), 206.0);
    }

    #[test]
    fn test_hyper_dash_events() {
        let mut catcher = catcher();
        catcher.set_hyper_dash_state(2.0, 400.0);
        assert!(catcher.hyper_dashing());
        assert_eq!(catcher.hyper_dash().direction, 1);
        catcher.set_hyper_dash_state(1.0, -1.0);
        assert!(!catcher.hyper_dashing());
        assert_eq!(
            catcher.take_events(),
            vec![
                CatcherEvent::HyperDashStarted { direction: 1 },
                CatcherEvent::HyperDashEnded
            ]
        );
        assert!(catcher.take_events().is_empty());
    }

    #[test]
    fn test_hyper_dash_to_own_position_is_cancelled() {
        let mut catcher = catcher();
        catcher.set_hyper_dash_state(3.0, catcher.x());
        assert!(!catcher.hyper_dashing());
        assert_eq!(catcher.hyper_dash().direction, 0);
    }

    #[test]
    fn test_miss_fails_unless_banana() {
        let mut catcher = catcher();
        let mut banana = CatchJudgementResult::new(
            PalpableCatchHitObject::new(0, PalpableKind::Banana, 0.0, 0.0),
            false,
            0.0,
        );
        catcher.on_new_result(&mut banana);
        assert_eq!(catcher.current_state(), CatcherAnimationState::Idle);

        let mut fruit =
            CatchJudgementResult::new(PalpableCatchHitObject::fruit(1, 10.0, 0.0), false, 10.0);
        catcher.on_new_result(&mut fruit);
        assert_eq!(catcher.current_state(), CatcherAnimationState::Fail);
        assert!(catcher.stack().stacked().is_empty());
    }

    #[test]
    fn test_tiny_droplets_leave_state_alone() {
        let mut catcher = catcher();
        let mut miss =
            CatchJudgementResult::new(PalpableCatchHitObject::fruit(0, 0.0, 0.0), false, 0.0);
        catcher.on_new_result(&mut miss);

        let mut droplet = CatchJudgementResult::new(
            PalpableCatchHitObject::new(1, PalpableKind::TinyDroplet, 10.0, 256.0),
            true,
            10.0,
        );
        catcher.on_new_result(&mut droplet);
        assert_eq!(catcher.current_state(), CatcherAnimationState::Fail);
        assert_eq!(catcher.stack().stacked().len(), 1);
    }
}
