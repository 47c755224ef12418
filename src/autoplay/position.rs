use glam::Vec2;
use serde::Serialize;

use crate::*;

/// Cursor position at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct CursorSample {
    pub time: f64,
    pub position: Vec2,
}

/// Where the cursor sits while spinning at `time`. The angle advances one
/// radian per [`SPIN_ANGLE_DIVISOR`] ms of real time, so faster playback spins
/// slower per beatmap millisecond.
pub fn spin_position(time: f64, clock_rate: f64) -> Vec2 {
    SPINNER_CENTRE + circle_position(time / clock_rate / SPIN_ANGLE_DIVISOR, SPIN_RADIUS)
}

#[derive(Debug, Clone, Copy)]
struct Anchor {
    time: f64,
    position: Vec2,
    object: usize,
    spinner: bool,
}

/// Fills the gaps between active hitpoints with cursor samples.
pub struct PositionGenerator<'a> {
    beatmap: &'a Beatmap,
    timeline: &'a Timeline,
    config: &'a AutoGeneratorConfig,
    preempt: f64,
    samples: Vec<CursorSample>,
}

impl<'a> PositionGenerator<'a> {
    pub fn new(
        beatmap: &'a Beatmap,
        timeline: &'a Timeline,
        config: &'a AutoGeneratorConfig,
    ) -> Self {
        Self {
            beatmap,
            timeline,
            config,
            preempt: beatmap.difficulty.time_preempt(),
            samples: Vec::new(),
        }
    }

    pub fn generate(mut self, hitpoints: &[Hitpoint]) -> Vec<CursorSample> {
        // Spinners anchor their own start and end, so a spinner opening or
        // closing the map is spun through like any other pair of anchors.
        let anchors: Vec<Anchor> = hitpoints.iter().map(|h| self.anchor(h)).collect();
        let Some(first) = anchors.first().copied() else {
            return self.samples;
        };
        self.push(first.time, first.position);

        for pair in anchors.windows(2) {
            self.fill(pair[0], pair[1]);
        }

        log::debug!(
            "Generated {} cursor samples for {} hitpoints",
            self.samples.len(),
            hitpoints.len()
        );
        self.samples
    }

    fn anchor(&self, hitpoint: &Hitpoint) -> Anchor {
        Anchor {
            time: hitpoint.time,
            position: hitpoint.position(self.beatmap, self.config.clock_rate),
            object: hitpoint.object,
            spinner: self.beatmap.hit_objects[hitpoint.object].is_spinner(),
        }
    }

    /// Samples must be strictly increasing in time; later duplicates lose.
    fn push(&mut self, time: f64, position: Vec2) {
        if self.samples.last().is_some_and(|last| time <= last.time) {
            return;
        }
        self.samples.push(CursorSample::new(time, position));
    }

    /// Times strictly between `start` and `end`, one frame interval apart.
    fn frame_times(&self, start: f64, end: f64) -> impl Iterator<Item = f64> {
        let interval = self.config.frame_interval;
        (1..)
            .map(move |step| start + step as f64 * interval)
            .take_while(move |time| *time < end)
    }

    fn fill(&mut self, left: Anchor, right: Anchor) {
        let beatmap = self.beatmap;
        let object = &beatmap.hit_objects[left.object];
        if left.object == right.object && object.as_slider().is_some() {
            let times: Vec<f64> = self.frame_times(left.time, right.time).collect();
            for time in times {
                self.push(time, object.stacked_position_at(time));
            }
            self.push(right.time, right.position);
            return;
        }

        let mut from = (left.time, left.position);
        for spin in self.usable_spins(&left, &right) {
            let entry = spin_position(spin.start, self.config.clock_rate);
            self.travel(from, (spin.start, entry), Easing::OutCubic);
            self.push(spin.start, entry);
            let times: Vec<f64> = self.frame_times(spin.start, spin.end).collect();
            for time in times {
                self.push(time, spin_position(time, self.config.clock_rate));
            }
            let exit = spin_position(spin.end, self.config.clock_rate);
            self.push(spin.end, exit);
            from = (spin.end, exit);
        }

        self.move_to(from, &right);
    }

    /// Spin zones between two anchors worth spinning through. Away from a
    /// spinner anchor the zone is shortened by the spin buffer, so streams
    /// next to a spinner are not disturbed.
    fn usable_spins(&self, left: &Anchor, right: &Anchor) -> Vec<Interval> {
        let buffer = self.config.spin_buffer;
        let left_buffer = if left.spinner { 0.0 } else { buffer };
        let right_buffer = if right.spinner { 0.0 } else { buffer };
        self.timeline
            .spin_zones()
            .intersect(left.time, right.time)
            .iter()
            .filter_map(|zone| {
                let start = zone.start.max(left.time + left_buffer);
                let end = zone.end.min(right.time - right_buffer);
                (start < end).then(|| Interval::new(start, end))
            })
            .collect()
    }

    /// Moves towards `right`, waiting until it has been visible for the
    /// reaction time but always arriving at least `min_move_time` early.
    fn move_to(&mut self, from: (f64, Vec2), right: &Anchor) {
        let visible = if right.spinner {
            self.timeline
                .spin_visible_zones()
                .get_interval_containing(right.time)
                .map_or(right.time - self.preempt, |zone| zone.start)
        } else {
            right.time - self.preempt
        };
        let start = (visible + self.config.reaction_time * self.config.clock_rate)
            .min(right.time - self.config.min_move_time)
            .max(from.0);

        let easing = if self.config.delayed_movement {
            Easing::InOutCubic
        } else {
            Easing::OutCubic
        };

        if from.1 != right.position {
            self.push(start, from.1);
            self.travel((start, from.1), (right.time, right.position), easing);
        }
        self.push(right.time, right.position);
    }

    fn travel(&mut self, from: (f64, Vec2), to: (f64, Vec2), easing: Easing) {
        let (start, start_position) = from;
        let (end, end_position) = to;
        if end <= start || start_position == end_position {
            return;
        }
        let times: Vec<f64> = self.frame_times(start, end).collect();
        for time in times {
            let progress = (time - start) / (end - start);
            self.push(
                time,
                eased_position(start_position, end_position, progress, easing),
            );
        }
    }
}
