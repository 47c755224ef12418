use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatchAction {
    MoveLeft,
    MoveRight,
    Dash,
}

/// Owns the [`Catcher`] and feeds it input, either from held actions or from
/// replay frames.
#[derive(Debug, Clone)]
pub struct CatcherArea {
    catcher: Catcher,
    move_left: bool,
    move_right: bool,
    replay_state: Option<CatchReplayFrame>,
}

impl CatcherArea {
    pub fn new(difficulty: &BeatmapDifficulty, seed: u64) -> Self {
        Self {
            catcher: Catcher::new(difficulty, seed),
            move_left: false,
            move_right: false,
            replay_state: None,
        }
    }

    pub fn catcher(&self) -> &Catcher {
        &self.catcher
    }

    pub fn catcher_mut(&mut self) -> &mut Catcher {
        &mut self.catcher
    }

    pub fn on_pressed(&mut self, action: CatchAction) {
        match action {
            CatchAction::MoveLeft => self.move_left = true,
            CatchAction::MoveRight => self.move_right = true,
            CatchAction::Dash => self.catcher.set_dashing(true),
        }
    }

    pub fn on_released(&mut self, action: CatchAction) {
        match action {
            CatchAction::MoveLeft => self.move_left = false,
            CatchAction::MoveRight => self.move_right = false,
            CatchAction::Dash => self.catcher.set_dashing(false),
        }
    }

    pub fn direction(&self) -> i32 {
        self.move_right as i32 - self.move_left as i32
    }

    /// From now on the catcher follows the replay instead of held actions.
    pub fn apply_replay_frame(&mut self, frame: CatchReplayFrame) {
        self.catcher.set_dashing(frame.dashing);
        self.replay_state = Some(frame);
    }

    pub fn update(&mut self, elapsed: f64) {
        match self.replay_state {
            Some(frame) => {
                self.catcher.update_position(frame.x);
                self.catcher.update(elapsed, 0);
            }
            None => self.catcher.update(elapsed, self.direction()),
        }
    }

    /// Runs [`CatcherArea::update`] up to `time` on the catcher clock.
    pub fn advance_to(&mut self, time: f64) {
        self.update((time - self.catcher.time()).max(0.0));
    }

    /// Applies a judgement, clearing the plate when the object ends its
    /// combo.
    pub fn on_new_result(&mut self, result: &mut CatchJudgementResult) {
        self.catcher.on_new_result(result);

        if result.object.last_in_combo {
            let time = result.time_absolute;
            result.cleared = if result.is_hit && !result.object.is_banana() {
                self.catcher.explode(time)
            } else {
                self.catcher.drop_all(time)
            };
        }
    }

    pub fn on_revert_result(&mut self, result: &CatchJudgementResult) {
        self.catcher.on_revert_result(result);
    }
}
