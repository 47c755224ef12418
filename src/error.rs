use std::backtrace::Backtrace;
use thiserror::Error;

/// [`ReplaySynthErrorVariant`] enumerates everything that can go wrong while
/// turning external beatmap data into replays or while driving a catcher from
/// replay frames. Most variants describe malformed input handed to us by the
/// beatmap loader; the generator itself never fails once its input validated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplaySynthErrorVariant {
    #[error("Beatmap has no hit objects")]
    NoHitObjects,

    #[error("Hit object {index} starts at {time} which is before the previous object at {previous}")]
    UnorderedHitObjects {
        index: usize,
        time: f64,
        previous: f64,
    },

    #[error("Hit object {index} has a non-finite time")]
    NonFiniteTime { index: usize },

    #[error("Hit object {index} ends at {end_time} before it starts at {start_time}")]
    NegativeDuration {
        index: usize,
        start_time: f64,
        end_time: f64,
    },

    #[error("Slider {index} has no path points")]
    EmptySliderPath { index: usize },

    #[error("Clock rate {rate} is not a positive finite number")]
    InvalidClockRate { rate: f64 },

    #[error("Frame interval {interval} is not a positive finite number")]
    InvalidFrameInterval { interval: f64 },

    #[error("Catch replay has no frames")]
    NoReplayFrames,

    #[error("Catch replay frame {index} is earlier than the frame before it")]
    UnorderedReplayFrames { index: usize },

    #[error("Error returned to deliberately end processing early")]
    FinishProcessingEarly,
}

/// [`ReplaySynthError`] pairs a [`ReplaySynthErrorVariant`] with the
/// backtrace captured where it was raised.
#[derive(Debug)]
pub struct ReplaySynthError {
    pub backtrace: Backtrace,
    pub variant: ReplaySynthErrorVariant,
}

impl ReplaySynthError {
    pub fn new(variant: ReplaySynthErrorVariant) -> Self {
        Self {
            backtrace: Backtrace::capture(),
            variant,
        }
    }

    pub fn new_result<T>(variant: ReplaySynthErrorVariant) -> Result<T, Self> {
        Err(Self::new(variant))
    }
}

impl std::fmt::Display for ReplaySynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.variant)
    }
}

impl std::error::Error for ReplaySynthError {}

impl From<ReplaySynthErrorVariant> for ReplaySynthError {
    fn from(variant: ReplaySynthErrorVariant) -> Self {
        Self::new(variant)
    }
}

#[allow(clippy::result_large_err)]
pub type ReplaySynthResult<T> = Result<T, ReplaySynthError>;
