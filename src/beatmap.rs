use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatmapDifficulty {
    pub circle_size: f32,
    pub approach_rate: f32,
}

impl Default for BeatmapDifficulty {
    fn default() -> Self {
        Self {
            circle_size: 5.0,
            approach_rate: 5.0,
        }
    }
}

impl BeatmapDifficulty {
    /// Time between an object appearing and its start time.
    pub fn time_preempt(&self) -> f64 {
        difficulty_range(self.approach_rate as f64, 450.0, 1200.0, 1800.0)
    }
}

/// The ordered hit-object list handed over by the beatmap loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Beatmap {
    #[serde(default)]
    pub difficulty: BeatmapDifficulty,
    pub hit_objects: Vec<OsuHitObject>,
}

impl Beatmap {
    pub fn new(difficulty: BeatmapDifficulty, hit_objects: Vec<OsuHitObject>) -> Self {
        Self {
            difficulty,
            hit_objects,
        }
    }

    pub fn validate(&self) -> ReplaySynthResult<()> {
        if self.hit_objects.is_empty() {
            return ReplaySynthError::new_result(ReplaySynthErrorVariant::NoHitObjects);
        }

        let mut previous = f64::NEG_INFINITY;
        for (index, object) in self.hit_objects.iter().enumerate() {
            let end_time = object.end_time();
            if !object.start_time.is_finite() || !end_time.is_finite() {
                return ReplaySynthError::new_result(ReplaySynthErrorVariant::NonFiniteTime {
                    index,
                });
            }
            if object.start_time < previous {
                return ReplaySynthError::new_result(
                    ReplaySynthErrorVariant::UnorderedHitObjects {
                        index,
                        time: object.start_time,
                        previous,
                    },
                );
            }
            if end_time < object.start_time {
                return ReplaySynthError::new_result(ReplaySynthErrorVariant::NegativeDuration {
                    index,
                    start_time: object.start_time,
                    end_time,
                });
            }
            if let HitObjectKind::Slider(slider) = &object.kind {
                if slider.path.points.is_empty() {
                    return ReplaySynthError::new_result(
                        ReplaySynthErrorVariant::EmptySliderPath { index },
                    );
                }
            }
            previous = object.start_time;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsuHitObject {
    pub start_time: f64,
    pub position: Vec2,
    #[serde(default)]
    pub stack_offset: Vec2,
    pub kind: HitObjectKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HitObjectKind {
    Circle,
    Slider(Slider),
    Spinner { end_time: f64 },
}

impl OsuHitObject {
    pub fn circle(start_time: f64, position: Vec2) -> Self {
        Self {
            start_time,
            position,
            stack_offset: Vec2::ZERO,
            kind: HitObjectKind::Circle,
        }
    }

    pub fn slider(start_time: f64, position: Vec2, slider: Slider) -> Self {
        Self {
            start_time,
            position,
            stack_offset: Vec2::ZERO,
            kind: HitObjectKind::Slider(slider),
        }
    }

    pub fn spinner(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            position: SPINNER_CENTRE,
            stack_offset: Vec2::ZERO,
            kind: HitObjectKind::Spinner { end_time },
        }
    }

    pub fn end_time(&self) -> f64 {
        match &self.kind {
            HitObjectKind::Circle => self.start_time,
            HitObjectKind::Slider(slider) => slider.end_time,
            HitObjectKind::Spinner { end_time } => *end_time,
        }
    }

    pub fn stacked_position(&self) -> Vec2 {
        self.position + self.stack_offset
    }

    pub fn is_spinner(&self) -> bool {
        matches!(self.kind, HitObjectKind::Spinner { .. })
    }

    pub fn as_slider(&self) -> Option<&Slider> {
        match &self.kind {
            HitObjectKind::Slider(slider) => Some(slider),
            _ => None,
        }
    }

    /// Where the cursor has to be at `time` to track this object. Sliders are
    /// sampled along their path while they are running.
    pub fn stacked_position_at(&self, time: f64) -> Vec2 {
        match self.as_slider() {
            Some(slider) if time > self.start_time => {
                self.stacked_position() + slider.path_offset_at(self.start_time, time)
            }
            _ => self.stacked_position(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub end_time: f64,
    #[serde(default)]
    pub repeat_count: u32,
    pub path: SliderPath,
    #[serde(default)]
    pub nested: Vec<SliderEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SliderEventKind {
    Tick,
    Repeat,
    Tail,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct SliderEvent {
    pub time: f64,
    pub kind: SliderEventKind,
}

impl Slider {
    pub fn span_count(&self) -> u32 {
        self.repeat_count + 1
    }

    /// Offset from the slider head at `time`, following the path back and
    /// forth once per span.
    pub fn path_offset_at(&self, start_time: f64, time: f64) -> Vec2 {
        let duration = self.end_time - start_time;
        let progress = if duration > 0.0 {
            ((time - start_time) / duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let span_count = self.span_count() as f64;
        let span_progress = progress * span_count;
        let span = span_progress.floor().min(span_count - 1.0);
        let mut fraction = span_progress - span;
        if span as u32 % 2 == 1 {
            fraction = 1.0 - fraction;
        }
        self.path.position_at(fraction)
    }

    /// Nested events in the order they are tracked. Events run in time order,
    /// except that the last real tick is moved behind everything else, as
    /// legacy scoring did.
    ///
    /// The order only shows in `Timeline::hitpoints` and in the order of
    /// hitpoints sharing a key frame. Key frames are keyed by time, so the
    /// generated cursor path is the same either way.
    pub fn tracking_order(&self) -> Vec<SliderEvent> {
        let mut events = self.nested.clone();
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
        if let Some(last_tick) = events
            .iter()
            .rposition(|e| e.kind == SliderEventKind::Tick)
        {
            let tick = events.remove(last_tick);
            events.push(tick);
        }
        events
    }
}

/// A polyline relative to the slider head, sampled by arc length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, new)]
pub struct SliderPath {
    pub points: Vec<Vec2>,
}

impl SliderPath {
    pub fn length(&self) -> f32 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .sum()
    }

    pub fn position_at(&self, progress: f64) -> Vec2 {
        let Some(first) = self.points.first() else {
            return Vec2::ZERO;
        };
        let total = self.length();
        if total <= 0.0 {
            return *first;
        }

        let target = progress.clamp(0.0, 1.0) as f32 * total;
        let mut travelled = 0.0;
        for pair in self.points.windows(2) {
            let segment = pair[0].distance(pair[1]);
            if travelled + segment >= target {
                if segment <= 0.0 {
                    return pair[0];
                }
                return pair[0].lerp(pair[1], (target - travelled) / segment);
            }
            travelled += segment;
        }
        self.points[self.points.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_slider(repeat_count: u32) -> Slider {
        Slider {
            end_time: 1000.0,
            repeat_count,
            path: SliderPath::new(vec![Vec2::ZERO, Vec2::new(100.0, 0.0)]),
            nested: Vec::new(),
        }
    }

    #[test]
    fn test_path_position_by_arc_length() {
        let path = SliderPath::new(vec![
            Vec2::ZERO,
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 100.0),
        ]);
        assert_eq!(path.length(), 200.0);
        assert_eq!(path.position_at(0.25), Vec2::new(50.0, 0.0));
        assert_eq!(path.position_at(0.75), Vec2::new(100.0, 50.0));
        assert_eq!(path.position_at(2.0), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_repeat_spans_reverse() {
        let slider = straight_slider(1);
        assert_eq!(slider.path_offset_at(0.0, 250.0), Vec2::new(50.0, 0.0));
        assert_eq!(slider.path_offset_at(0.0, 500.0), Vec2::new(100.0, 0.0));
        assert_eq!(slider.path_offset_at(0.0, 750.0), Vec2::new(50.0, 0.0));
        assert_eq!(slider.path_offset_at(0.0, 1000.0), Vec2::ZERO);
    }

    #[test]
    fn test_tracking_order_moves_last_tick_to_end() {
        let mut slider = straight_slider(0);
        slider.nested = vec![
            SliderEvent::new(1000.0, SliderEventKind::Tail),
            SliderEvent::new(250.0, SliderEventKind::Tick),
            SliderEvent::new(500.0, SliderEventKind::Tick),
        ];
        let times: Vec<_> = slider.tracking_order().iter().map(|e| e.time).collect();
        assert_eq!(times, vec![250.0, 1000.0, 500.0]);
    }

    #[test]
    fn test_validate_rejects_unordered_objects() {
        let beatmap = Beatmap::new(
            BeatmapDifficulty::default(),
            vec![
                OsuHitObject::circle(500.0, Vec2::ZERO),
                OsuHitObject::circle(100.0, Vec2::ZERO),
            ],
        );
        let err = beatmap.validate().unwrap_err();
        assert_eq!(
            err.variant,
            ReplaySynthErrorVariant::UnorderedHitObjects {
                index: 1,
                time: 100.0,
                previous: 500.0
            }
        );
    }

    #[test]
    fn test_validate_rejects_empty_and_negative() {
        let empty = Beatmap::default();
        assert_eq!(
            empty.validate().unwrap_err().variant,
            ReplaySynthErrorVariant::NoHitObjects
        );

        let backwards = Beatmap::new(
            BeatmapDifficulty::default(),
            vec![OsuHitObject::spinner(1000.0, 500.0)],
        );
        assert!(matches!(
            backwards.validate().unwrap_err().variant,
            ReplaySynthErrorVariant::NegativeDuration { index: 0, .. }
        ));
    }

    #[test]
    fn test_preempt_from_approach_rate() {
        let mut difficulty = BeatmapDifficulty::default();
        assert_eq!(difficulty.time_preempt(), 1200.0);
        difficulty.approach_rate = 10.0;
        assert_eq!(difficulty.time_preempt(), 450.0);
    }
}
