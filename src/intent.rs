use std::str::FromStr;

use alarm_core::WallTime;

/// One line of user input.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    /// Arm, optionally at a new time. The time is kept as typed so a bad
    /// value surfaces as the scheduler's error.
    Arm(Option<String>),
    Disarm,
    Toggle,
    SetTime(String),
    Label(Option<String>),
    Stop,
    Snooze(Option<u32>),
    Status,
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnknownIntent(pub String);

impl FromStr for Intent {
    type Err = UnknownIntent;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());
        let unknown = || UnknownIntent(line.to_string());

        let intent = match (word.to_ascii_lowercase().as_str(), arg) {
            ("arm" | "a" | "on", arg) => Intent::Arm(arg),
            ("disarm" | "off", None) => Intent::Disarm,
            ("toggle" | "t", None) => Intent::Toggle,
            ("set", Some(time)) => Intent::SetTime(time),
            ("label", arg) => Intent::Label(arg),
            ("stop" | "s", None) => Intent::Stop,
            ("snooze" | "z", None) => Intent::Snooze(None),
            ("snooze" | "z", Some(minutes)) => {
                Intent::Snooze(Some(minutes.parse().map_err(|_| unknown())?))
            }
            ("status" | "", None) => Intent::Status,
            ("help" | "h" | "?", None) => Intent::Help,
            ("quit" | "q" | "exit", None) => Intent::Quit,
            // A bare time sets it, like picking it on a dial
            (time, None) if time.parse::<WallTime>().is_ok() => Intent::SetTime(time.to_string()),
            _ => return Err(unknown()),
        };
        Ok(intent)
    }
}

pub const HELP_TEXT: &str = "WAKE ALARM HELP\n\n\
     arm [HH:MM]    Arm (optionally at a new time)\n\
     disarm         Turn the alarm off\n\
     t, toggle      Flip ON/OFF\n\
     set HH:MM      Change the time\n\
     label [text]   Name the alarm\n\
     s, stop        Silence and turn off\n\
     z, snooze [m]  Ring again m minutes later\n\
     status         Show the alarm\n\
     q, quit        Exit";
