use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Easing curves used for cursor travel and dropped-object animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    #[default]
    None,
    OutCubic,
    InOutCubic,
    InSine,
    OutSine,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the curve. Progress outside the
    /// unit range is clamped.
    pub fn apply(self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Easing::None => t,
            Easing::OutCubic => {
                let inv = t - 1.0;
                inv * inv * inv + 1.0
            }
            Easing::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = t - 1.0;
                    4.0 * inv * inv * inv + 1.0
                }
            }
            Easing::InSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::OutSine => (t * PI / 2.0).sin(),
        }
    }
}

pub fn lerp(start: f64, end: f64, percent: f64) -> f64 {
    start + (end - start) * percent
}

pub fn eased_position(start: Vec2, end: Vec2, progress: f64, easing: Easing) -> Vec2 {
    start.lerp(end, easing.apply(progress) as f32)
}

/// Point on a circle of `radius` at `angle` radians, relative to the centre.
pub fn circle_position(angle: f64, radius: f32) -> Vec2 {
    Vec2::new(angle.cos() as f32, angle.sin() as f32) * radius
}

/// Piecewise-linear map used by every difficulty attribute: `min` at 0, `avg`
/// at 5 and `max` at 10.
pub fn difficulty_range(val: f64, max: f64, avg: f64, min: f64) -> f64 {
    if val > 5.0 {
        avg + (max - avg) * (val - 5.0) / 5.0
    } else if val < 5.0 {
        avg - (avg - min) * (5.0 - val) / 5.0
    } else {
        avg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SearchDirection {
    Forward,
    Backward,
}

pub fn find_in_direction<T, F, R>(
    items: &[T],
    current_index: usize,
    direction: SearchDirection,
    predicate: F,
) -> Option<(usize, R)>
where
    F: Fn(&T) -> Option<R>,
{
    let mut iter: Box<dyn Iterator<Item = (usize, &T)>> = match direction {
        SearchDirection::Forward => Box::new(
            items[current_index + 1..]
                .iter()
                .enumerate()
                .map(move |(i, item)| (i + current_index + 1, item)),
        ),
        SearchDirection::Backward => Box::new(items[..current_index].iter().enumerate().rev()),
    };

    iter.find_map(|(i, item)| predicate(item).map(|res| (i, res)))
}
