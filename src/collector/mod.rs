pub mod decorator;
pub mod replay_data;

pub use decorator::*;
pub use replay_data::*;

use crate::*;

/// What a [`Collector`] wants to see next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeAdvance {
    /// Call again for the frame covering this time.
    Time(f64),
    NextFrame,
}

/// Walks the frames of a [`Replay`]. `current_time` is at or after the time
/// of `frame` and before the time of the frame that follows it.
pub trait Collector: Sized {
    fn process_frame(
        &mut self,
        replay: &Replay,
        frame: &ReplayFrame,
        frame_index: usize,
        current_time: f64,
    ) -> ReplaySynthResult<TimeAdvance>;

    fn process_replay(mut self, replay: &Replay) -> ReplaySynthResult<Self> {
        replay.process(&mut self)?;
        Ok(self)
    }
}

impl<G> Collector for G
where
    G: FnMut(&Replay, &ReplayFrame, usize, f64) -> ReplaySynthResult<TimeAdvance>,
{
    fn process_frame(
        &mut self,
        replay: &Replay,
        frame: &ReplayFrame,
        frame_index: usize,
        current_time: f64,
    ) -> ReplaySynthResult<TimeAdvance> {
        self(replay, frame, frame_index, current_time)
    }
}
