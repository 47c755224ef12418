//! Synthesizes autoplay replays from beatmap hit objects and simulates the
//! catch ruleset's catcher against replay input.
//!
//! The osu! side runs as a batch: [`AutoGenerator::generate`] validates a
//! [`Beatmap`], plans buttons and cursor movement over a shared time axis and
//! returns a [`Replay`]. The catch side is frame stepped: a [`CatchProcessor`]
//! drives a [`CatcherArea`] from [`CatchReplayFrame`]s, and every judgement it
//! applies can be reverted again.

mod autoplay;
mod beatmap;
mod catch;
mod collector;
pub mod constants;
mod error;
mod interval;
mod util;


pub use crate::autoplay::*;
pub use crate::beatmap::*;
pub use crate::catch::*;
pub use crate::collector::*;
pub use crate::constants::*;
pub use crate::error::*;
pub use crate::interval::*;
pub use crate::util::*;

#[macro_use]
extern crate derive_new;
