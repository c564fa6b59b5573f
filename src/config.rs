use std::time::Duration;

use alarm_core::{WallTime, DEFAULT_SNOOZE_MINUTES};
use clap::Parser;

use crate::alerts::AlertConfig;

/// Wake alarm with snooze. Type `help` once running for the command list.
#[derive(Parser, Debug)]
#[command(name = "wake-alarm", version, about)]
pub struct Settings {
    /// Arm the alarm for this time (HH:MM) at start-up
    #[arg(long, value_name = "HH:MM")]
    pub at: Option<WallTime>,

    /// Label shown while the alarm rings
    #[arg(long)]
    pub label: Option<String>,

    /// Minutes added to the alarm time on each snooze
    #[arg(long = "snooze", value_name = "MINUTES", default_value_t = DEFAULT_SNOOZE_MINUTES)]
    pub snooze_minutes: u32,

    /// Siren volume from 0.0 to 1.0
    #[arg(long, default_value_t = 1.0, value_parser = parse_volume)]
    pub volume: f32,

    /// Ring without sound
    #[arg(long)]
    pub mute: bool,

    /// Don't ring the terminal bell or print the wake-up banner
    #[arg(long)]
    pub quiet: bool,

    /// Clock sample period in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1000, value_parser = clap::value_parser!(u64).range(10..=30_000))]
    pub tick_ms: u64,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Settings {
    pub fn alert_config(&self) -> AlertConfig {
        AlertConfig {
            audio: !self.mute,
            notification: !self.quiet,
            volume: self.volume,
        }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

fn parse_volume(s: &str) -> Result<f32, String> {
    let volume: f32 = s.parse().map_err(|_| format!("{s:?} is not a number"))?;
    if (0.0..=1.0).contains(&volume) {
        Ok(volume)
    } else {
        Err(format!("volume must be between 0.0 and 1.0, got {volume}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::try_parse_from(["wake-alarm"]).unwrap();
        assert_eq!(settings.at, None);
        assert_eq!(settings.snooze_minutes, 5);
        assert_eq!(settings.tick_period(), Duration::from_secs(1));
        assert_eq!(settings.alert_config(), AlertConfig::default());
        assert_eq!(settings.log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_full_command_line() {
        let settings = Settings::try_parse_from([
            "wake-alarm", "--at", "6:45", "--label", "Flight", "--snooze", "9",
            "--volume", "0.25", "--mute", "--tick-ms", "250", "-vv",
        ])
        .unwrap();
        assert_eq!(settings.at, WallTime::new(6, 45));
        assert_eq!(settings.label.as_deref(), Some("Flight"));
        assert_eq!(settings.snooze_minutes, 9);
        assert!(!settings.alert_config().audio);
        assert_eq!(settings.alert_config().volume, 0.25);
        assert_eq!(settings.tick_period(), Duration::from_millis(250));
        assert_eq!(settings.log_level(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Settings::try_parse_from(["wake-alarm", "--at", "25:99"]).is_err());
        assert!(Settings::try_parse_from(["wake-alarm", "--volume", "2"]).is_err());
        assert!(Settings::try_parse_from(["wake-alarm", "--tick-ms", "0"]).is_err());
    }
}
