use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct ReplayFrame {
    pub time: f64,
    pub x: f32,
    pub y: f32,
    pub buttons: ReplayButtonState,
}

impl ReplayFrame {
    fn at(time: f64, position: Vec2, buttons: ReplayButtonState) -> Self {
        Self::new(time, position.x, position.y, buttons)
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// An ordered frame list. Frame times are strictly increasing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, new)]
pub struct Replay {
    pub frames: Vec<ReplayFrame>,
}

impl Replay {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Time between the first and the last frame.
    pub fn duration(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Index of the last frame at or before `time`.
    fn frame_index_at(&self, time: f64) -> Option<usize> {
        self.frames
            .partition_point(|frame| frame.time <= time)
            .checked_sub(1)
    }

    pub fn button_state_at(&self, time: f64) -> ReplayButtonState {
        self.frame_index_at(time)
            .map(|index| self.frames[index].buttons)
            .unwrap_or_default()
    }

    /// Cursor position at `time`, linearly interpolated between frames and
    /// held constant outside the replay.
    pub fn position_at(&self, time: f64) -> Option<Vec2> {
        let first = self.frames.first()?;
        let Some(index) = self.frame_index_at(time) else {
            return Some(first.position());
        };
        let frame = &self.frames[index];
        match self.frames.get(index + 1) {
            Some(next) => {
                let progress = (time - frame.time) / (next.time - frame.time);
                Some(frame.position().lerp(next.position(), progress as f32))
            }
            None => Some(frame.position()),
        }
    }

    pub fn as_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn process<C: Collector>(&self, collector: &mut C) -> ReplaySynthResult<()> {
        let mut target: Option<f64> = None;
        for (index, frame) in self.frames.iter().enumerate() {
            let next_time = self.frames.get(index + 1).map(|next| next.time);
            if let (Some(target), Some(next_time)) = (target, next_time) {
                if target >= next_time {
                    continue;
                }
            }

            let mut current_time = target.map_or(frame.time, |target| target.max(frame.time));
            loop {
                let advance = match collector.process_frame(self, frame, index, current_time) {
                    Err(ReplaySynthError {
                        variant: ReplaySynthErrorVariant::FinishProcessingEarly,
                        ..
                    }) => return Ok(()),
                    other => other?,
                };
                match advance {
                    TimeAdvance::NextFrame => {
                        target = None;
                        break;
                    }
                    TimeAdvance::Time(time) => {
                        target = Some(time);
                        match next_time {
                            Some(next_time) if time > current_time && time < next_time => {
                                current_time = time;
                            }
                            _ => break,
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Merges cursor samples and button changes into replay frames.
///
/// Two intro frames park the cursor below the playfield before the first
/// object. Every distinct time from either input gets exactly one frame; a
/// button change without a matching cursor sample reuses the latest earlier
/// position.
pub fn assemble_frames(
    first_object_time: f64,
    positions: &[CursorSample],
    buttons: &[ButtonChange],
) -> Vec<ReplayFrame> {
    let mut frames = vec![ReplayFrame::at(
        INTRO_FRAME_TIME,
        INTRO_POSITION,
        ReplayButtonState::empty(),
    )];
    let lead_in = first_object_time - INTRO_LEAD_TIME;
    if lead_in > INTRO_FRAME_TIME {
        frames.push(ReplayFrame::at(
            lead_in,
            INTRO_POSITION,
            ReplayButtonState::empty(),
        ));
    }

    let mut position = INTRO_POSITION;
    let mut state = ReplayButtonState::empty();
    let mut positions = positions.iter().peekable();
    let mut buttons = buttons.iter().peekable();

    loop {
        let next_position = positions.peek().map(|sample| sample.time);
        let next_button = buttons.peek().map(|change| change.time);
        let time = match (next_position, next_button) {
            (Some(p), Some(b)) => p.min(b),
            (Some(p), None) => p,
            (None, Some(b)) => b,
            (None, None) => break,
        };

        if next_position == Some(time) {
            if let Some(sample) = positions.next() {
                position = sample.position;
            }
        }
        if next_button == Some(time) {
            if let Some(change) = buttons.next() {
                state = change.state;
            }
        }

        match frames.last_mut() {
            Some(last) if last.time >= time => {
                // Only reachable for samples at or before the intro frames.
                last.x = position.x;
                last.y = position.y;
            }
            _ => frames.push(ReplayFrame::at(time, position, state)),
        }
    }

    if let Some(first) = frames.first_mut() {
        first.buttons = ReplayButtonState::empty();
    }
    log::debug!("Assembled {} replay frames", frames.len());
    frames
}

/// Collects the replay state at every processed time. Pair it with a
/// [`FrameRateDecorator`] to resample a replay at a fixed rate.
#[derive(Debug, Clone, Default)]
pub struct ReplaySampleCollector {
    samples: Vec<ReplayFrame>,
}

impl ReplaySampleCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[ReplayFrame] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<ReplayFrame> {
        self.samples
    }
}

impl Collector for ReplaySampleCollector {
    fn process_frame(
        &mut self,
        replay: &Replay,
        frame: &ReplayFrame,
        _frame_index: usize,
        current_time: f64,
    ) -> ReplaySynthResult<TimeAdvance> {
        let position = replay
            .position_at(current_time)
            .unwrap_or_else(|| frame.position());
        self.samples
            .push(ReplayFrame::at(current_time, position, frame.buttons));
        Ok(TimeAdvance::NextFrame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay() -> Replay {
        Replay::new(vec![
            ReplayFrame::new(0.0, 0.0, 0.0, ReplayButtonState::empty()),
            ReplayFrame::new(100.0, 100.0, 0.0, ReplayButtonState::LEFT1),
            ReplayFrame::new(200.0, 100.0, 100.0, ReplayButtonState::empty()),
        ])
    }

    #[test]
    fn test_lookup_between_frames() {
        let replay = replay();
        assert_eq!(replay.frame_count(), 3);
        assert_eq!(replay.duration(), 200.0);
        assert_eq!(replay.button_state_at(-5.0), ReplayButtonState::empty());
        assert_eq!(replay.button_state_at(150.0), ReplayButtonState::LEFT1);
        assert_eq!(replay.button_state_at(200.0), ReplayButtonState::empty());
        assert_eq!(replay.position_at(50.0), Some(Vec2::new(50.0, 0.0)));
        assert_eq!(replay.position_at(-50.0), Some(Vec2::ZERO));
        assert_eq!(replay.position_at(500.0), Some(Vec2::new(100.0, 100.0)));
        assert_eq!(Replay::default().position_at(0.0), None);
    }

    #[test]
    fn test_process_visits_every_frame_once() {
        let mut visited = Vec::new();
        let collect = |_: &Replay, _: &ReplayFrame, index: usize, time: f64| -> ReplaySynthResult<TimeAdvance> {
            visited.push((index, time));
            Ok(TimeAdvance::NextFrame)
        };
        collect.process_replay(&replay()).unwrap();
        assert_eq!(visited, vec![(0, 0.0), (1, 100.0), (2, 200.0)]);
    }

    #[test]
    fn test_time_advance_skips_frames() {
        let mut visited = Vec::new();
        let collect = |_: &Replay, _: &ReplayFrame, index: usize, time: f64| -> ReplaySynthResult<TimeAdvance> {
            visited.push((index, time));
            Ok(TimeAdvance::Time(time + 40.0))
        };
        collect.process_replay(&replay()).unwrap();
        assert_eq!(
            visited,
            vec![(0, 0.0), (0, 40.0), (0, 80.0), (1, 120.0), (1, 160.0), (2, 200.0)]
        );
    }

    #[test]
    fn test_finish_early_is_not_an_error() {
        let mut calls = 0;
        let collect = |_: &Replay, _: &ReplayFrame, _: usize, _: f64| -> ReplaySynthResult<TimeAdvance> {
            calls += 1;
            ReplaySynthError::new_result(ReplaySynthErrorVariant::FinishProcessingEarly)
        };
        assert!(collect.process_replay(&replay()).is_ok());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_frame_rate_decorator_resamples() {
        let mut collector = ReplaySampleCollector::new();
        FrameRateDecorator::new(50.0, &mut collector)
            .process_replay(&replay())
            .unwrap();
        let times: Vec<_> = collector.samples().iter().map(|f| f.time).collect();
        assert_eq!(times, vec![0.0, 50.0, 100.0, 150.0, 200.0]);
        assert_eq!(collector.samples()[1].position(), Vec2::new(50.0, 0.0));
        assert_eq!(collector.samples()[3].buttons, ReplayButtonState::LEFT1);
    }

    #[test]
    fn test_assembler_inserts_button_only_frames() {
        let positions = vec![
            CursorSample::new(0.0, Vec2::new(10.0, 10.0)),
            CursorSample::new(100.0, Vec2::new(20.0, 20.0)),
        ];
        let buttons = vec![
            ButtonChange::new(0.0, ReplayButtonState::LEFT1),
            ButtonChange::new(50.0, ReplayButtonState::empty()),
        ];
        let frames = assemble_frames(0.0, &positions, &buttons);
        assert_eq!(
            frames,
            vec![
                ReplayFrame::new(-100_000.0, 256.0, 500.0, ReplayButtonState::empty()),
                ReplayFrame::new(-1500.0, 256.0, 500.0, ReplayButtonState::empty()),
                ReplayFrame::new(0.0, 10.0, 10.0, ReplayButtonState::LEFT1),
                ReplayFrame::new(50.0, 10.0, 10.0, ReplayButtonState::empty()),
                ReplayFrame::new(100.0, 20.0, 20.0, ReplayButtonState::empty()),
            ]
        );
    }
}
