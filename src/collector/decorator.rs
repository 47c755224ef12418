use crate::*;

/// Resamples any [`Collector`] at a fixed rate. The wrapped collector can
/// still ask to skip further ahead, but never sees two calls closer together
/// than one interval.
pub struct FrameRateDecorator<'a, C> {
    desired_interval: f64,
    collector: &'a mut C,
}

impl<'a, C> FrameRateDecorator<'a, C> {
    pub fn new(desired_interval: f64, collector: &'a mut C) -> Self {
        Self {
            desired_interval,
            collector,
        }
    }

    pub fn new_from_fps(fps: f64, collector: &'a mut C) -> Self {
        Self::new(1000.0 / fps, collector)
    }
}

impl<C: Collector> Collector for FrameRateDecorator<'_, C> {
    fn process_frame(
        &mut self,
        replay: &Replay,
        frame: &ReplayFrame,
        frame_index: usize,
        current_time: f64,
    ) -> ReplaySynthResult<TimeAdvance> {
        let next = current_time + self.desired_interval;
        Ok(
            match self
                .collector
                .process_frame(replay, frame, frame_index, current_time)?
            {
                TimeAdvance::Time(time) => TimeAdvance::Time(time.max(next)),
                TimeAdvance::NextFrame => TimeAdvance::Time(next),
            },
        )
    }
}
