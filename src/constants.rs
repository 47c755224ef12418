use glam::Vec2;

// osu! auto generation
pub const SPINNER_CENTRE: Vec2 = Vec2::new(256.0, 192.0);
pub const SPIN_RADIUS: f32 = 50.0;
/// Spin angle advances one radian per this many real-time milliseconds.
pub const SPIN_ANGLE_DIVISOR: f64 = 20.0;

pub const INTRO_FRAME_TIME: f64 = -100_000.0;
pub const INTRO_LEAD_TIME: f64 = 1500.0;
pub const INTRO_POSITION: Vec2 = Vec2::new(256.0, 500.0);

pub const KEY_UP_DELAY: f64 = 50.0;
pub const REACTION_TIME: f64 = 100.0;
pub const MIN_MOVE_TIME: f64 = 50.0;
pub const SPIN_BUFFER: f64 = 300.0;
pub const ALTERNATE_THRESHOLD: f64 = 150.0;
pub const FRAME_INTERVAL: f64 = 1000.0 / 60.0;

// osu!catch
pub const CATCH_PLAYFIELD_WIDTH: f32 = 512.0;
pub const CATCH_PLAYFIELD_CENTRE: f32 = CATCH_PLAYFIELD_WIDTH / 2.0;
pub const CATCHER_BASE_SIZE: f32 = 106.75;
pub const ALLOWED_CATCH_RANGE: f32 = 0.8;
pub const BASE_DASH_SPEED: f64 = 1.0;
pub const BASE_WALK_SPEED: f64 = 0.5;
pub const CATCH_OBJECT_RADIUS: f32 = 64.0;
/// Stable's plate lenience is 10px at an object scale of 1.
pub const STACK_LENIENCE_ADJUST: f32 = 10.0 / CATCH_OBJECT_RADIUS;
pub const STACK_VERTICAL_JITTER: f32 = 5.0;
pub const MAX_STACK_ATTEMPTS: usize = 100;
/// Frame time assumed when deciding whether a jump needs a hyper-dash.
pub const HYPER_DASH_FRAME_TIME: f64 = 1000.0 / 60.0;

pub const DROP_DURATION: f64 = 750.0;
pub const DROP_DISTANCE: f32 = 75.0;
pub const EXPLODE_RISE_DURATION: f64 = 250.0;
pub const EXPLODE_FALL_DURATION: f64 = 500.0;
pub const EXPLODE_HEIGHT: f32 = 50.0;
pub const EXPLODE_HORIZONTAL_DURATION: f64 = 1000.0;
pub const EXPLODE_HORIZONTAL_FACTOR: f32 = 6.0;
