//! Red-Light domain: round time limit.

use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClockSettings {
    pub limit_secs: f32,
    /// Count down from the limit; counting up never expires
    pub countdown: bool,
    /// Remaining time at which the display turns to a warning
    pub warning_secs: f32,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            limit_secs: 60.0,
            countdown: true,
            warning_secs: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockUrgency {
    Normal,
    Warning,
    Danger,
}

#[derive(Debug, Clone)]
pub struct RoundClock {
    settings: ClockSettings,
    /// Seconds left when counting down, seconds elapsed when counting up
    current: f32,
    running: bool,
}

impl RoundClock {
    pub fn new(settings: ClockSettings) -> Self {
        let current = if settings.countdown { settings.limit_secs } else { 0.0 };
        Self {
            settings,
            current,
            running: true,
        }
    }

    /// Advance the clock. Returns true only on the tick a countdown expires.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.running {
            return false;
        }

        let dt = delta.as_secs_f32();
        if !self.settings.countdown {
            self.current += dt;
            return false;
        }

        self.current = (self.current - dt).max(0.0);
        if self.current <= 0.0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.settings.clone());
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds shown to the player.
    pub fn display_secs(&self) -> f32 {
        self.current
    }

    pub fn urgency(&self) -> ClockUrgency {
        if !self.settings.countdown {
            return ClockUrgency::Normal;
        }
        if self.current <= self.settings.warning_secs * 0.5 {
            ClockUrgency::Danger
        } else if self.current <= self.settings.warning_secs {
            ClockUrgency::Warning
        } else {
            ClockUrgency::Normal
        }
    }

    pub fn formatted(&self) -> String {
        format_clock(self.current)
    }
}

/// Whole seconds as `MM:SS`.
pub fn format_clock(secs: f32) -> String {
    let total = secs.max(0.0).floor() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}
