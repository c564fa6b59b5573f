//! Pure alarm logic with no audio or terminal dependencies.
//! Testable on host; the binary supplies the clock and the speaker.

mod error;
mod scheduler;
mod signal;
mod time;

pub use error::AlarmError;
pub use scheduler::{AlarmConfig, AlarmPhase, AlarmScheduler, DEFAULT_SNOOZE_MINUTES};
pub use signal::{AlertSignal, Siren, SirenParams, Waveform};
pub use time::{add_minutes, minute_key, TimeSource, WallTime};
