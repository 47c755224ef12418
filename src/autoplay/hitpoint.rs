use float_ord::FloatOrd;
use glam::Vec2;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::*;

/// A moment at which the cursor has to be on an object, and possibly click it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct Hitpoint {
    pub time: f64,
    /// Index into the beatmap's hit objects.
    pub object: usize,
    pub click: bool,
    pub movement: bool,
}

impl Hitpoint {
    pub fn position(&self, beatmap: &Beatmap, clock_rate: f64) -> Vec2 {
        let object = &beatmap.hit_objects[self.object];
        if object.is_spinner() {
            spin_position(self.time, clock_rate)
        } else {
            object.stacked_position_at(self.time)
        }
    }
}

/// Where a key frame sits relative to the hold zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum IntervalState {
    #[default]
    None,
    Start,
    Mid,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFrame {
    pub time: f64,
    /// Indices into [`Timeline::hitpoints`], in hit-object order.
    pub hitpoints: Vec<usize>,
    pub hold: IntervalState,
}

impl KeyFrame {
    fn new(time: f64) -> Self {
        Self {
            time,
            hitpoints: Vec::new(),
            hold: IntervalState::None,
        }
    }

    pub fn has_click(&self, hitpoints: &[Hitpoint]) -> bool {
        self.hitpoints.iter().any(|&index| hitpoints[index].click)
    }
}

/// Everything the planners need, derived once from the hit-object list.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    hitpoints: Vec<Hitpoint>,
    key_frames: BTreeMap<FloatOrd<f64>, KeyFrame>,
    hold_zones: IntervalSet,
    spin_zones: IntervalSet,
    spin_visible_zones: IntervalSet,
}

impl Timeline {
    pub fn collect(beatmap: &Beatmap, key_up_delay: f64) -> Self {
        let mut timeline = Self::default();
        let preempt = beatmap.difficulty.time_preempt();

        for (index, object) in beatmap.hit_objects.iter().enumerate() {
            match &object.kind {
                HitObjectKind::Circle => {
                    timeline.add_hitpoint(Hitpoint::new(object.start_time, index, true, true));
                }
                HitObjectKind::Slider(slider) => {
                    timeline.add_hitpoint(Hitpoint::new(object.start_time, index, true, true));
                    for event in slider.tracking_order() {
                        timeline.add_hitpoint(Hitpoint::new(event.time, index, false, true));
                    }
                }
                HitObjectKind::Spinner { end_time } => {
                    timeline.spin_zones.add_interval(object.start_time, *end_time);
                    timeline
                        .spin_visible_zones
                        .add_interval(object.start_time - preempt, *end_time);
                    timeline.add_hitpoint(Hitpoint::new(object.start_time, index, false, true));
                    timeline.add_hitpoint(Hitpoint::new(*end_time, index, false, true));
                }
            }
            timeline
                .hold_zones
                .add_interval(object.start_time, object.end_time() + key_up_delay);
        }

        timeline.tag_hold_zones();
        log::debug!(
            "Collected {} hitpoints over {} key frames, {} hold zones, {} spin zones",
            timeline.hitpoints.len(),
            timeline.key_frames.len(),
            timeline.hold_zones.len(),
            timeline.spin_zones.len()
        );
        timeline
    }

    fn key_frame_mut(&mut self, time: f64) -> &mut KeyFrame {
        self.key_frames
            .entry(FloatOrd(time))
            .or_insert_with(|| KeyFrame::new(time))
    }

    fn add_hitpoint(&mut self, hitpoint: Hitpoint) {
        let index = self.hitpoints.len();
        self.hitpoints.push(hitpoint);
        self.key_frame_mut(hitpoint.time).hitpoints.push(index);
    }

    /// Marks where each hold zone starts and ends, and every key frame inside
    /// it. Spin zones need no tags: the position generator reads them
    /// directly.
    fn tag_hold_zones(&mut self) {
        let holds: Vec<Interval> = self.hold_zones.iter().copied().collect();
        for zone in holds {
            self.key_frame_mut(zone.start).hold = IntervalState::Start;
            if zone.end <= zone.start {
                continue;
            }
            self.key_frame_mut(zone.end).hold = IntervalState::End;
            for (_, frame) in self
                .key_frames
                .range_mut(FloatOrd(zone.start)..FloatOrd(zone.end))
                .skip(1)
            {
                frame.hold = IntervalState::Mid;
            }
        }
    }

    pub fn hitpoints(&self) -> &[Hitpoint] {
        &self.hitpoints
    }

    pub fn key_frames(&self) -> impl Iterator<Item = &KeyFrame> {
        self.key_frames.values()
    }

    pub fn key_frame_at(&self, time: f64) -> Option<&KeyFrame> {
        self.key_frames.get(&FloatOrd(time))
    }

    pub fn hold_zones(&self) -> &IntervalSet {
        &self.hold_zones
    }

    pub fn spin_zones(&self) -> &IntervalSet {
        &self.spin_zones
    }

    pub fn spin_visible_zones(&self) -> &IntervalSet {
        &self.spin_visible_zones
    }

    /// One hitpoint per key frame: the first click if there is one, otherwise
    /// the first movement target. Simultaneous clicks therefore resolve to the
    /// object that comes first in the beatmap, matching a single legacy cursor.
    pub fn active_hitpoints(&self) -> Vec<Hitpoint> {
        self.key_frames
            .values()
            .filter_map(|frame| {
                frame
                    .hitpoints
                    .iter()
                    .map(|&index| self.hitpoints[index])
                    .find(|hitpoint| hitpoint.click)
                    .or_else(|| frame.hitpoints.first().map(|&index| self.hitpoints[index]))
            })
            .collect()
    }
}
