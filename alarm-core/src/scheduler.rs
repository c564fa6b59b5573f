use chrono::Timelike;

use crate::error::AlarmError;
use crate::signal::AlertSignal;
use crate::time::{add_minutes, minute_key, WallTime};

pub const DEFAULT_SNOOZE_MINUTES: u32 = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AlarmPhase {
    Idle,
    Armed,
    Ringing,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct AlarmConfig {
    pub time: WallTime,
    pub armed: bool,
    pub label: Option<String>,
}

/// Tick-driven alarm state machine.
///
/// The alarm fires on the first tick whose minute matches the configured
/// time. The minute it fired in is remembered so later ticks in that same
/// minute are ignored, and forgotten as soon as a tick lands in any other
/// minute, which lets the alarm ring again on the next day.
pub struct AlarmScheduler<A: AlertSignal> {
    config: AlarmConfig,
    ringing: bool,
    fingerprint: Option<WallTime>,
    alert: A,
}

impl<A: AlertSignal> AlarmScheduler<A> {
    pub fn new(alert: A) -> Self {
        Self::with_config(AlarmConfig::default(), alert)
    }

    pub fn with_config(config: AlarmConfig, alert: A) -> Self {
        Self {
            config,
            ringing: false,
            fingerprint: None,
            alert,
        }
    }

    pub fn phase(&self) -> AlarmPhase {
        if self.ringing {
            AlarmPhase::Ringing
        } else if self.config.armed {
            AlarmPhase::Armed
        } else {
            AlarmPhase::Idle
        }
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    pub fn alarm_time(&self) -> WallTime {
        self.config.time
    }

    pub fn is_armed(&self) -> bool {
        self.config.armed
    }

    pub fn is_ringing(&self) -> bool {
        self.ringing
    }

    pub fn alert(&self) -> &A {
        &self.alert
    }

    /// Parse `time` and arm the alarm for it. Ignored while ringing.
    pub fn arm(&mut self, time: &str) -> Result<(), AlarmError> {
        let time = time.parse::<WallTime>()?;
        self.arm_at(time);
        Ok(())
    }

    pub fn arm_at(&mut self, time: WallTime) {
        if self.ringing {
            log::debug!("arm({}) ignored while ringing", time);
            return;
        }
        self.config.time = time;
        self.config.armed = true;
        log::info!("alarm armed for {}", time);
    }

    /// Change the alarm time without touching the armed flag.
    pub fn set_time(&mut self, time: &str) -> Result<(), AlarmError> {
        let time = time.parse::<WallTime>()?;
        if self.ringing {
            log::debug!("set_time({}) ignored while ringing", time);
            return Ok(());
        }
        self.config.time = time;
        log::info!("alarm time set to {}", time);
        Ok(())
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.config.label = label.filter(|l| !l.trim().is_empty());
    }

    /// Clears the armed flag. A ringing alarm keeps ringing until `stop`.
    pub fn disarm(&mut self) {
        if self.config.armed {
            log::info!("alarm disarmed");
        }
        self.config.armed = false;
    }

    /// Flip the armed flag, keeping the configured time. Returns the new flag.
    pub fn toggle(&mut self) -> bool {
        if self.config.armed {
            self.disarm();
        } else if self.ringing {
            log::debug!("toggle ignored while ringing");
        } else {
            self.arm_at(self.config.time);
        }
        self.config.armed
    }

    /// Feed one clock sample. Returns true if the alarm started ringing.
    pub fn tick<T: Timelike>(&mut self, now: &T) -> bool {
        let key = minute_key(now);
        // Any other minute clears the marker, whatever the phase
        if key != self.config.time {
            self.fingerprint = None;
            return false;
        }
        if self.phase() != AlarmPhase::Armed || self.fingerprint == Some(key) {
            return false;
        }

        self.fingerprint = Some(key);
        self.ringing = true;
        log::info!("alarm ringing at {}", key);
        self.alert.start();
        true
    }

    /// Silence and disarm. Safe in any phase.
    pub fn stop(&mut self) {
        if self.ringing {
            log::info!("alarm stopped");
        }
        self.ringing = false;
        self.config.armed = false;
        self.alert.stop();
    }

    /// Silence and re-arm `delta_minutes` after the current alarm time.
    /// Returns the new alarm time, or `None` if the alarm wasn't ringing.
    pub fn snooze(&mut self, delta_minutes: u32) -> Option<WallTime> {
        if !self.ringing {
            log::debug!("snooze ignored, alarm not ringing");
            return None;
        }
        let next = add_minutes(self.config.time, delta_minutes);
        self.config.time = next;
        self.config.armed = true;
        self.ringing = false;
        self.alert.stop();
        log::info!("alarm snoozed until {}", next);
        Some(next)
    }
}
