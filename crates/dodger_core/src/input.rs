//! Abstract per-tick input
//!
//! Key and mouse state is resolved by the host before each tick. "Held" flags
//! are level-triggered; "triggered" flags are true only on the tick the
//! action was pressed.

use crate::foundation::math::Vec3;

/// Player intent for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    /// Forward key held
    pub move_forward: bool,
    /// Backward key held
    pub move_backward: bool,
    /// Strafe-left key held
    pub move_left: bool,
    /// Strafe-right key held
    pub move_right: bool,
    /// Jump pressed this tick
    pub jump: bool,
    /// Trigger held
    pub fire: bool,
    /// Reload pressed this tick
    pub reload: bool,
    /// Weapon switch pressed this tick
    pub switch_weapon: bool,
    /// Pickup pressed this tick
    pub pickup: bool,
    /// Dash pressed this tick
    pub dash: bool,
    /// Camera forward direction
    pub view_forward: Vec3,
    /// Camera right direction
    pub view_right: Vec3,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            move_forward: false,
            move_backward: false,
            move_left: false,
            move_right: false,
            jump: false,
            fire: false,
            reload: false,
            switch_weapon: false,
            pickup: false,
            dash: false,
            view_forward: Vec3::new(0.0, 0.0, -1.0),
            view_right: Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

impl InputState {
    /// Look along `forward`, deriving the right vector from world up
    pub fn looking(mut self, forward: Vec3) -> Self {
        self.view_forward = forward;
        if let Some(right) = forward.cross(&crate::foundation::math::up()).try_normalize(1e-6) {
            self.view_right = right;
        }
        self
    }
}

/// Builds edge-triggered input from held key state across ticks
#[derive(Debug, Clone, Copy, Default)]
pub struct InputTracker {
    jump_held: bool,
    reload_held: bool,
    switch_held: bool,
    pickup_held: bool,
    dash_held: bool,
}

/// Raw held state of the keys the tracker edge-detects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    /// Jump key down
    pub jump: bool,
    /// Reload key down
    pub reload: bool,
    /// Switch key down
    pub switch_weapon: bool,
    /// Pickup key down
    pub pickup: bool,
    /// Dash key down
    pub dash: bool,
}

impl InputTracker {
    /// Fold this tick's held keys into `input`, setting triggers on press edges
    pub fn update(&mut self, keys: HeldKeys, mut input: InputState) -> InputState {
        input.jump = keys.jump && !self.jump_held;
        input.reload = keys.reload && !self.reload_held;
        input.switch_weapon = keys.switch_weapon && !self.switch_held;
        input.pickup = keys.pickup && !self.pickup_held;
        input.dash = keys.dash && !self.dash_held;

        self.jump_held = keys.jump;
        self.reload_held = keys.reload;
        self.switch_held = keys.switch_weapon;
        self.pickup_held = keys.pickup;
        self.dash_held = keys.dash;
        input
    }
}
