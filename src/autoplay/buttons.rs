use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Button {
    #[default]
    None,
    Left,
    Right,
}

impl Button {
    pub fn other(self) -> Button {
        match self {
            Button::Left => Button::Right,
            Button::Right => Button::Left,
            Button::None => Button::None,
        }
    }

    pub fn state(self) -> ReplayButtonState {
        match self {
            Button::None => ReplayButtonState::empty(),
            Button::Left => ReplayButtonState::LEFT1,
            Button::Right => ReplayButtonState::RIGHT1,
        }
    }
}

bitflags! {
    /// Buttons held in a replay frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ReplayButtonState: u8 {
        const LEFT1 = 1;
        const RIGHT1 = 1 << 1;
        const LEFT2 = 1 << 2;
        const RIGHT2 = 1 << 3;
        const SMOKE = 1 << 4;
    }
}

/// The buttons held at one instant. A plan never holds the same button twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct ButtonPlan {
    pub primary: Button,
    pub secondary: Button,
}

impl ButtonPlan {
    pub fn num_held(&self) -> usize {
        [self.primary, self.secondary]
            .iter()
            .filter(|b| **b != Button::None)
            .count()
    }

    pub fn state(&self) -> ReplayButtonState {
        self.primary.state() | self.secondary.state()
    }
}

/// What a press does while another button is already down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TwoButtonMode {
    /// Keep holding the first button and add the other one.
    #[default]
    Overlay,
    /// Let go of the held button and press the other one instead.
    Cycle,
}

/// One physical press, from going down to coming back up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyPress {
    pub button: Button,
    pub down: f64,
    pub up: f64,
    /// Pressed while nothing else was held.
    pub fresh: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, new)]
pub struct ButtonChange {
    pub time: f64,
    pub state: ReplayButtonState,
}

#[derive(Debug, Clone)]
pub struct ButtonPlanner {
    mode: TwoButtonMode,
    alternate_threshold: f64,
    plan: ButtonPlan,
    last_used_left: f64,
    last_used_right: f64,
    presses: Vec<KeyPress>,
    open_left: Option<usize>,
    open_right: Option<usize>,
}

impl ButtonPlanner {
    pub fn new(mode: TwoButtonMode, alternate_threshold: f64) -> Self {
        Self {
            mode,
            alternate_threshold,
            plan: ButtonPlan::default(),
            last_used_left: f64::NEG_INFINITY,
            last_used_right: f64::NEG_INFINITY,
            presses: Vec::new(),
            open_left: None,
            open_right: None,
        }
    }

    pub fn plan(&self) -> ButtonPlan {
        self.plan
    }

    pub fn num_held(&self) -> usize {
        self.plan.num_held()
    }

    /// Picks the button for a press with nothing held. Left is the default;
    /// only when Left was let go within the alternation threshold does the
    /// least recently used button take over.
    fn fresh_button(&self, time: f64) -> Button {
        if time - self.last_used_left < self.alternate_threshold
            && self.last_used_right < self.last_used_left
        {
            Button::Right
        } else {
            Button::Left
        }
    }

    fn open_slot(&mut self, button: Button) -> &mut Option<usize> {
        match button {
            Button::Right => &mut self.open_right,
            _ => &mut self.open_left,
        }
    }

    fn go_down(&mut self, button: Button, time: f64, fresh: bool) {
        let index = self.presses.len();
        self.presses.push(KeyPress {
            button,
            down: time,
            up: time,
            fresh,
        });
        *self.open_slot(button) = Some(index);
        log::trace!("{:?} down at {}", button, time);
    }

    fn go_up(&mut self, button: Button, time: f64) {
        if let Some(index) = self.open_slot(button).take() {
            self.presses[index].up = time;
        }
        match button {
            Button::Left => self.last_used_left = time,
            Button::Right => self.last_used_right = time,
            Button::None => {}
        }
        log::trace!("{:?} up at {}", button, time);
    }

    /// Presses a button at `time` and returns the resulting plan.
    ///
    /// # Panics
    ///
    /// Panics when both buttons are already held. Callers release first.
    pub fn press(&mut self, time: f64) -> ButtonPlan {
        match self.num_held() {
            0 => {
                let button = self.fresh_button(time);
                self.plan = ButtonPlan {
                    primary: button,
                    secondary: Button::None,
                };
                self.go_down(button, time, true);
            }
            1 => {
                let other = self.plan.primary.other();
                match self.mode {
                    TwoButtonMode::Overlay => {
                        self.plan.secondary = other;
                    }
                    TwoButtonMode::Cycle => {
                        self.go_up(self.plan.primary, time);
                        self.plan.primary = other;
                    }
                }
                self.go_down(other, time, false);
            }
            held => panic!("press at {time} with {held} buttons already held"),
        }
        self.plan
    }

    /// Lets go of the button held longest.
    pub fn release(&mut self, time: f64) -> ButtonPlan {
        if self.plan.primary != Button::None {
            self.go_up(self.plan.primary, time);
            self.plan.primary = self.plan.secondary;
            self.plan.secondary = Button::None;
        }
        self.plan
    }

    pub fn release_all(&mut self, time: f64) -> ButtonPlan {
        while self.num_held() > 0 {
            self.release(time);
        }
        self.plan
    }

    pub fn into_presses(mut self, time: f64) -> Vec<KeyPress> {
        self.release_all(time);
        self.presses
    }
}

/// Walks the tagged key frames and records every press the planner makes.
pub fn plan_presses(timeline: &Timeline, config: &AutoGeneratorConfig) -> Vec<KeyPress> {
    let mut planner = ButtonPlanner::new(config.two_button_mode, config.alternate_threshold);
    let mut last_time = f64::NEG_INFINITY;

    for frame in timeline.key_frames() {
        let time = frame.time;
        last_time = time;
        match frame.hold {
            IntervalState::Start => {
                planner.press(time);
                let degenerate = timeline
                    .hold_zones()
                    .get_interval_containing(time)
                    .is_some_and(|zone| zone.length() <= 0.0);
                if degenerate {
                    planner.release_all(time);
                }
            }
            IntervalState::Mid if frame.has_click(timeline.hitpoints()) => {
                if planner.num_held() == 2 {
                    planner.release(time);
                }
                planner.press(time);
            }
            IntervalState::End => {
                planner.release_all(time);
            }
            _ => {}
        }
    }

    planner.into_presses(last_time)
}

/// Holds fresh presses for at least `key_up_delay`, unless the same button is
/// needed again before then. A press that would run into the next press of its
/// button lets go halfway between the two, but never before the other button
/// has taken over, so a hold zone is never left with nothing held.
pub fn extend_presses(presses: &mut [KeyPress], key_up_delay: f64) {
    let planned = presses.to_vec();
    for (index, press) in planned.iter().enumerate() {
        let next_down = find_in_direction(&planned, index, SearchDirection::Forward, |p| {
            (p.button == press.button).then_some(p.down)
        })
        .map(|(_, down)| down);

        let mut up = press.up;
        if press.fresh {
            up = up.max(press.down + key_up_delay);
        }
        if let Some(next) = next_down {
            if up >= next {
                let midpoint = (press.down + next) / 2.0;
                up = if press.up < next {
                    press.up.max(midpoint)
                } else {
                    covering_down(&planned, press.button, next)
                        .map_or(midpoint, |down| midpoint.max(down))
                };
            }
        }
        presses[index].up = up;
    }
}

/// Earliest press of the other button that goes down before `time` and is
/// still held at it.
fn covering_down(presses: &[KeyPress], button: Button, time: f64) -> Option<f64> {
    presses
        .iter()
        .filter(|p| p.button != button && p.down < time && p.up >= time)
        .map(|p| p.down)
        .min_by(|a, b| a.total_cmp(b))
}

/// Flattens presses into the instants at which the held state changes.
pub fn button_changes(presses: &[KeyPress]) -> Vec<ButtonChange> {
    let mut events: Vec<(f64, Button, bool)> = presses
        .iter()
        .flat_map(|p| [(p.down, p.button, true), (p.up, p.button, false)])
        .collect();
    events.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut changes = Vec::new();
    let mut state = ReplayButtonState::empty();
    let mut emitted = ReplayButtonState::empty();
    let mut index = 0;
    while index < events.len() {
        let time = events[index].0;
        while index < events.len() && events[index].0 == time {
            let (_, button, down) = events[index];
            state.set(button.state(), down);
            index += 1;
        }
        if state != emitted {
            changes.push(ButtonChange::new(time, state));
            emitted = state;
        }
    }
    changes
}

pub fn plan_buttons(timeline: &Timeline, config: &AutoGeneratorConfig) -> Vec<ButtonChange> {
    let mut presses = plan_presses(timeline, config);
    extend_presses(&mut presses, config.key_up_delay);
    let changes = button_changes(&presses);
    log::debug!(
        "Planned {} presses into {} button changes",
        presses.len(),
        changes.len()
    );
    changes
}
