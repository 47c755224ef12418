use crate::*;

/// Receives every judgement [`CatchProcessor`] applies. Returning
/// [`ReplaySynthErrorVariant::FinishProcessingEarly`] stops processing
/// without failing it.
pub trait JudgementCollector {
    fn on_judgement(
        &mut self,
        area: &CatcherArea,
        result: &CatchJudgementResult,
    ) -> ReplaySynthResult<()>;
}

impl<G> JudgementCollector for G
where
    G: FnMut(&CatcherArea, &CatchJudgementResult) -> ReplaySynthResult<()>,
{
    fn on_judgement(
        &mut self,
        area: &CatcherArea,
        result: &CatchJudgementResult,
    ) -> ReplaySynthResult<()> {
        self(area, result)
    }
}

/// Plays catch replay frames against a beatmap and judges every palpable
/// object at its start time.
#[derive(Debug, Clone)]
pub struct CatchProcessor {
    area: CatcherArea,
    objects: Vec<PalpableCatchHitObject>,
    results: Vec<CatchJudgementResult>,
}

impl CatchProcessor {
    pub fn new(difficulty: &BeatmapDifficulty, objects: &[CatchHitObject], seed: u64) -> Self {
        Self {
            area: CatcherArea::new(difficulty, seed),
            objects: flatten_palpable(objects),
            results: Vec::new(),
        }
    }

    pub fn area(&self) -> &CatcherArea {
        &self.area
    }

    pub fn results(&self) -> &[CatchJudgementResult] {
        &self.results
    }

    pub fn hit_count(&self) -> usize {
        self.results.iter().filter(|result| result.is_hit).count()
    }

    pub fn miss_count(&self) -> usize {
        self.results.len() - self.hit_count()
    }

    fn validate_frames(frames: &[CatchReplayFrame]) -> ReplaySynthResult<()> {
        if frames.is_empty() {
            return ReplaySynthError::new_result(ReplaySynthErrorVariant::NoReplayFrames);
        }
        if let Some(index) = frames
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
        {
            return ReplaySynthError::new_result(ReplaySynthErrorVariant::UnorderedReplayFrames {
                index: index + 1,
            });
        }
        Ok(())
    }

    /// Judges every object not judged yet.
    pub fn process<C: JudgementCollector>(
        &mut self,
        frames: &[CatchReplayFrame],
        collector: &mut C,
    ) -> ReplaySynthResult<()> {
        Self::validate_frames(frames)?;

        while let Some(object) = self.objects.get(self.results.len()).cloned() {
            let time = object.start_time;
            if let Some(state) = catch_replay_state_at(frames, time) {
                self.area.apply_replay_frame(state);
            }
            self.area.advance_to(time);

            let is_hit = self.area.catcher().can_catch_palpable(&object);
            let mut result = CatchJudgementResult::new(object, is_hit, time);
            self.area.on_new_result(&mut result);
            log::trace!(
                "Object {} at {}: {}",
                result.object.id,
                time,
                if is_hit { "hit" } else { "miss" }
            );

            let outcome = collector.on_judgement(&self.area, &result);
            self.results.push(result);
            match outcome {
                Err(ReplaySynthError {
                    variant: ReplaySynthErrorVariant::FinishProcessingEarly,
                    ..
                }) => return Ok(()),
                other => other?,
            }
        }

        log::debug!(
            "Judged {} objects: {} hit, {} missed",
            self.results.len(),
            self.hit_count(),
            self.miss_count()
        );
        Ok(())
    }

    /// Undoes every result at or after `time`, newest first.
    pub fn revert_to(&mut self, time: f64) {
        while self
            .results
            .last()
            .is_some_and(|result| result.time_absolute >= time)
        {
            if let Some(result) = self.results.pop() {
                self.area.on_revert_result(&result);
            }
        }
    }
}
