use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct CatchReplayFrame {
    pub time: f64,
    pub x: f32,
    pub dashing: bool,
}

/// Catcher x and dash flag at `time`, linearly interpolated between frames.
pub fn catch_replay_state_at(frames: &[CatchReplayFrame], time: f64) -> Option<CatchReplayFrame> {
    let first = frames.first()?;
    let index = frames.partition_point(|frame| frame.time <= time);
    let Some(previous) = index.checked_sub(1).map(|i| frames[i]) else {
        return Some(CatchReplayFrame::new(time, first.x, first.dashing));
    };
    let x = match frames.get(index) {
        Some(next) if next.time > previous.time => {
            let progress = (time - previous.time) / (next.time - previous.time);
            lerp(previous.x as f64, next.x as f64, progress) as f32
        }
        _ => previous.x,
    };
    Some(CatchReplayFrame::new(time, x, previous.dashing))
}

/// Generates a replay that moves the catcher under every palpable object.
pub struct CatchAutoGenerator {
    objects: Vec<PalpableCatchHitObject>,
    half_catch_width: f32,
    frames: Vec<CatchReplayFrame>,
    last_position: f32,
    last_time: f64,
}

impl CatchAutoGenerator {
    pub fn new(difficulty: &BeatmapDifficulty, objects: &[CatchHitObject]) -> Self {
        Self {
            objects: flatten_palpable(objects),
            half_catch_width: catch_width_for_difficulty(difficulty) / 2.0,
            frames: Vec::new(),
            last_position: CATCH_PLAYFIELD_CENTRE,
            last_time: 0.0,
        }
    }

    pub fn generate(mut self) -> Vec<CatchReplayFrame> {
        let objects = std::mem::take(&mut self.objects);
        for object in &objects {
            self.move_to(object);
        }
        log::debug!(
            "Generated {} catch frames for {} objects",
            self.frames.len(),
            objects.len()
        );
        self.frames
    }

    fn move_to(&mut self, object: &PalpableCatchHitObject) {
        let target = object.effective_x();
        let position_change = (self.last_position - target).abs() as f64;
        let time_available = object.start_time - self.last_time;
        if time_available < 0.0 {
            return;
        }

        // Infinite when there is no time at all, which reads as impossible.
        let speed_required = if position_change == 0.0 {
            0.0
        } else {
            position_change / time_available
        };
        let dash_required = speed_required > BASE_WALK_SPEED;
        let impossible_jump = speed_required > BASE_DASH_SPEED;

        if self.last_position - self.half_catch_width < target
            && self.last_position + self.half_catch_width > target
        {
            self.last_time = object.start_time;
            self.add_frame(object.start_time, self.last_position, false);
            return;
        }

        if impossible_jump {
            self.add_frame(object.start_time, target, false);
        } else if object.hyper_dash() {
            self.add_frame(self.last_time, self.last_position, false);
            self.add_frame(object.start_time, target, false);
        } else if dash_required {
            // Dash for part of the way, then walk the rest.
            let time_at_walk_speed = position_change / BASE_WALK_SPEED;
            let time_at_dash_speed = (time_at_walk_speed - time_available) / 2.0;
            let mid_position = lerp(
                self.last_position as f64,
                target as f64,
                time_at_dash_speed / time_available,
            ) as f32;

            self.add_frame(self.last_time + 1.0, self.last_position, true);
            self.add_frame(self.last_time + time_at_dash_speed, mid_position, false);
            self.add_frame(object.start_time, target, false);
        } else {
            let time_before = position_change / BASE_WALK_SPEED;
            self.add_frame(object.start_time - time_before, self.last_position, false);
            self.add_frame(object.start_time, target, false);
        }

        self.last_time = object.start_time;
        self.last_position = target;
    }

    /// Frames stay in time order. A frame earlier than the last one is pulled
    /// forward to it, and a frame at the same time replaces it.
    fn add_frame(&mut self, time: f64, x: f32, dashing: bool) {
        let frame = CatchReplayFrame::new(time, x, dashing);
        match self.frames.last_mut() {
            Some(last) if time <= last.time => {
                *last = CatchReplayFrame { time: last.time, ..frame };
            }
            _ => self.frames.push(frame),
        }
    }
}
