use std::io::{self, Write};

use alarm_core::{AlarmConfig, AlarmPhase};
use chrono::NaiveDateTime;

use crate::clock::is_daytime;

const BELL: char = '\u{0007}';

pub fn format_clock(now: &NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}

fn alarm_summary(config: &AlarmConfig, phase: AlarmPhase) -> String {
    match phase {
        AlarmPhase::Idle => "Alarm disabled".to_string(),
        AlarmPhase::Armed => format!("Alarm set for {}", config.time),
        AlarmPhase::Ringing => format!("RINGING ({})", config.time),
    }
}

/// Rewrites the single live clock line in place.
pub fn draw_clock_line(
    out: &mut impl Write,
    now: &NaiveDateTime,
    config: &AlarmConfig,
    phase: AlarmPhase,
) -> io::Result<()> {
    let sky = if is_daytime(now) { "day" } else { "night" };
    write!(
        out,
        "\r{}  [{}]  {}\x1b[K",
        format_clock(now),
        sky,
        alarm_summary(config, phase)
    )?;
    out.flush()
}

pub fn draw_status(
    out: &mut impl Write,
    now: &NaiveDateTime,
    config: &AlarmConfig,
    phase: AlarmPhase,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", now.format("%A, %B %-d"))?;
    writeln!(out, "Now:    {}", format_clock(now))?;
    writeln!(out, "Alarm:  {} {}", config.time, if config.armed { "ON" } else { "OFF" })?;
    if let Some(label) = &config.label {
        writeln!(out, "Label:  {}", label)?;
    }
    writeln!(out, "{}", alarm_summary(config, phase))?;
    out.flush()
}

pub fn draw_ringing(
    out: &mut impl Write,
    now: &NaiveDateTime,
    config: &AlarmConfig,
    bell: bool,
) -> io::Result<()> {
    writeln!(out)?;
    if bell {
        write!(out, "{}", BELL)?;
    }
    writeln!(out, "*** WAKE UP! ***  {}", format_clock(now))?;
    if let Some(label) = &config.label {
        writeln!(out, "{}", label)?;
    }
    writeln!(out, "z = snooze, s = stop")?;
    out.flush()
}

pub fn draw_help(out: &mut impl Write, help_text: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", help_text)?;
    out.flush()
}

pub fn draw_message(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", message)?;
    out.flush()
}
