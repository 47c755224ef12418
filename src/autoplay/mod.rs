pub mod buttons;
pub mod hitpoint;
pub mod position;

pub use buttons::*;
pub use hitpoint::*;
pub use position::*;

use serde::{Deserialize, Serialize};

use crate::*;

/// Knobs for [`AutoGenerator`]. The defaults reproduce legacy auto output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoGeneratorConfig {
    pub clock_rate: f64,
    pub frame_interval: f64,
    pub key_up_delay: f64,
    /// Scaled by the clock rate.
    pub reaction_time: f64,
    pub min_move_time: f64,
    pub spin_buffer: f64,
    pub alternate_threshold: f64,
    pub two_button_mode: TwoButtonMode,
    /// Ease in and out instead of snapping towards the next object.
    pub delayed_movement: bool,
}

impl Default for AutoGeneratorConfig {
    fn default() -> Self {
        Self {
            clock_rate: 1.0,
            frame_interval: FRAME_INTERVAL,
            key_up_delay: KEY_UP_DELAY,
            reaction_time: REACTION_TIME,
            min_move_time: MIN_MOVE_TIME,
            spin_buffer: SPIN_BUFFER,
            alternate_threshold: ALTERNATE_THRESHOLD,
            two_button_mode: TwoButtonMode::Overlay,
            delayed_movement: false,
        }
    }
}

impl AutoGeneratorConfig {
    pub fn validate(&self) -> ReplaySynthResult<()> {
        if !self.clock_rate.is_finite() || self.clock_rate <= 0.0 {
            return ReplaySynthError::new_result(ReplaySynthErrorVariant::InvalidClockRate {
                rate: self.clock_rate,
            });
        }
        if !self.frame_interval.is_finite() || self.frame_interval <= 0.0 {
            return ReplaySynthError::new_result(ReplaySynthErrorVariant::InvalidFrameInterval {
                interval: self.frame_interval,
            });
        }
        Ok(())
    }
}

/// Builds a complete auto replay for one beatmap.
///
/// Generation runs in three passes over a shared time axis: the hit objects
/// are collected into tagged key frames, buttons and cursor positions are
/// planned from those independently, and the two timelines are merged into
/// replay frames.
#[derive(Debug, Clone, new)]
pub struct AutoGenerator<'a> {
    beatmap: &'a Beatmap,
    config: AutoGeneratorConfig,
}

impl<'a> AutoGenerator<'a> {
    pub fn with_defaults(beatmap: &'a Beatmap) -> Self {
        Self::new(beatmap, AutoGeneratorConfig::default())
    }

    pub fn config(&self) -> &AutoGeneratorConfig {
        &self.config
    }

    pub fn generate(&self) -> ReplaySynthResult<Replay> {
        self.beatmap.validate()?;
        self.config.validate()?;

        let timeline = Timeline::collect(self.beatmap, self.config.key_up_delay);
        let active = timeline.active_hitpoints();
        let positions = PositionGenerator::new(self.beatmap, &timeline, &self.config)
            .generate(&active);
        let buttons = plan_buttons(&timeline, &self.config);

        let first_time = self.beatmap.hit_objects[0].start_time;
        let replay = Replay::new(assemble_frames(first_time, &positions, &buttons));
        log::info!(
            "Generated {} replay frames for {} hit objects",
            replay.frame_count(),
            self.beatmap.hit_objects.len()
        );
        Ok(replay)
    }
}
