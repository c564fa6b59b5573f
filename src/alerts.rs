use std::time::Duration;

use alarm_core::{AlertSignal, Siren, SirenParams};
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use thiserror::Error;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Clone, Debug, PartialEq)]
pub struct AlertConfig {
    pub audio: bool,
    pub notification: bool,
    /// Sink volume, 0.0 to 1.0
    pub volume: f32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            audio: true,
            notification: true,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(#[from] rodio::StreamError),

    #[error("audio device refused playback: {0}")]
    PlaybackRefused(#[from] rodio::PlayError),
}

/// Feeds the endless siren into rodio.
pub struct SirenSource(Siren);

impl SirenSource {
    pub fn new(params: SirenParams, sample_rate: u32) -> Self {
        Self(Siren::new(params, sample_rate))
    }
}

impl Iterator for SirenSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        self.0.next()
    }
}

impl Source for SirenSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.0.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Where a ring's audio ends up. Each `play` opens one session, which lasts
/// until it is handed back to `halt` or dropped.
pub trait AudioDevice {
    type Session;

    /// Open the device ahead of the first ring.
    fn open(&mut self) -> Result<(), AudioError>;
    fn play(&mut self, source: SirenSource, volume: f32) -> Result<Self::Session, AudioError>;
    fn halt(&mut self, session: Self::Session);
}

/// The default output device. It is opened lazily and kept between rings,
/// and each ring gets its own `Sink`.
#[derive(Default)]
pub struct RodioDevice {
    // Dropping the stream closes the device, so it's held alongside the handle
    stream: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioDevice {
    fn handle(&mut self) -> Result<&OutputStreamHandle, AudioError> {
        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => {
                let stream = OutputStream::try_default()?;
                log::debug!("audio device opened");
                stream
            }
        };
        let (_, handle) = self.stream.insert(stream);
        Ok(handle)
    }
}

impl AudioDevice for RodioDevice {
    type Session = Sink;

    fn open(&mut self) -> Result<(), AudioError> {
        self.handle().map(|_| ())
    }

    fn play(&mut self, source: SirenSource, volume: f32) -> Result<Sink, AudioError> {
        let sink = match Sink::try_new(self.handle()?) {
            Ok(sink) => sink,
            Err(e) => {
                // Reopen on the next ring in case the device went away
                self.stream = None;
                return Err(e.into());
            }
        };
        sink.set_volume(volume);
        sink.append(source);
        // Resume in case the sink came up paused
        sink.play();
        Ok(sink)
    }

    fn halt(&mut self, sink: Sink) {
        sink.stop();
    }
}

/// Plays the siren through an `AudioDevice`.
///
/// At most one session exists at a time. Device failures are logged and the
/// ring carries on silently.
pub struct SirenAlert<D: AudioDevice = RodioDevice> {
    config: AlertConfig,
    params: SirenParams,
    device: D,
    session: Option<D::Session>,
}

impl SirenAlert {
    pub fn new(config: AlertConfig) -> Self {
        Self::with_device(config, RodioDevice::default())
    }
}

impl<D: AudioDevice> SirenAlert<D> {
    pub fn with_device(config: AlertConfig, device: D) -> Self {
        Self {
            config,
            params: SirenParams::default(),
            device,
            session: None,
        }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Open the output device ahead of the first ring.
    pub fn warm_up(&mut self) {
        if !self.config.audio {
            return;
        }
        if let Err(e) = self.device.open() {
            log::warn!("{}", e);
        }
    }
}

impl<D: AudioDevice> AlertSignal for SirenAlert<D> {
    fn start(&mut self) {
        if self.session.is_some() {
            log::warn!("siren already playing, restarting it");
            self.stop();
        }
        if !self.config.audio {
            log::info!("audio alerts disabled, ringing silently");
            return;
        }
        let volume = self.config.volume.clamp(0.0, 1.0);
        match self.device.play(SirenSource::new(self.params, SAMPLE_RATE), volume) {
            Ok(session) => {
                log::debug!("siren started");
                self.session = Some(session);
            }
            Err(e) => log::warn!("{}, ringing silently", e),
        }
    }

    fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            self.device.halt(session);
            log::debug!("siren stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.session.is_some()
    }
}

impl<D: AudioDevice> Drop for SirenAlert<D> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn muted() -> AlertConfig {
        AlertConfig {
            audio: false,
            ..AlertConfig::default()
        }
    }

    #[test]
    fn test_source_format() {
        let mut source = SirenSource::new(SirenParams::default(), SAMPLE_RATE);
        assert_eq!(source.channels(), 1);
        assert_eq!(source.sample_rate(), SAMPLE_RATE);
        assert_eq!(source.total_duration(), None);
        assert!(source.next().is_some());
    }

    #[test]
    fn test_muted_start_stop() {
        let mut alert = SirenAlert::new(muted());
        alert.start();
        assert!(!alert.is_active());
        alert.stop();
        alert.stop();
        assert!(!alert.is_active());
    }

    /// Counts sessions that are still playing.
    struct FakeDevice {
        live: Rc<Cell<i32>>,
        opened: u32,
        broken: bool,
    }

    struct FakeSession(Rc<Cell<i32>>);

    impl Drop for FakeSession {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    impl AudioDevice for FakeDevice {
        type Session = FakeSession;

        fn open(&mut self) -> Result<(), AudioError> {
            if self.broken {
                return Err(rodio::StreamError::NoDevice.into());
            }
            self.opened += 1;
            Ok(())
        }

        fn play(&mut self, mut source: SirenSource, _volume: f32) -> Result<FakeSession, AudioError> {
            self.open()?;
            assert!(source.next().is_some());
            self.live.set(self.live.get() + 1);
            Ok(FakeSession(self.live.clone()))
        }

        fn halt(&mut self, session: FakeSession) {
            drop(session);
        }
    }

    fn fake(broken: bool) -> (SirenAlert<FakeDevice>, Rc<Cell<i32>>) {
        let live = Rc::new(Cell::new(0));
        let device = FakeDevice {
            live: live.clone(),
            opened: 0,
            broken,
        };
        (SirenAlert::with_device(AlertConfig::default(), device), live)
    }

    #[test]
    fn test_double_start_keeps_one_session() {
        let (mut alert, live) = fake(false);
        alert.start();
        assert!(alert.is_active());
        assert_eq!(live.get(), 1);

        alert.start();
        assert!(alert.is_active());
        assert_eq!(live.get(), 1);
        assert_eq!(alert.device.opened, 2);

        alert.stop();
        assert!(!alert.is_active());
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_drop_ends_session() {
        let (mut alert, live) = fake(false);
        alert.start();
        drop(alert);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_broken_device_rings_silently() {
        let (mut alert, live) = fake(true);
        alert.warm_up();
        alert.start();
        assert!(!alert.is_active());
        assert_eq!(live.get(), 0);
        alert.stop();
        assert!(!alert.is_active());
    }

    #[test]
    fn test_muted_never_touches_device() {
        let (mut alert, live) = fake(false);
        alert.config.audio = false;
        alert.warm_up();
        alert.start();
        assert!(!alert.is_active());
        assert_eq!(live.get(), 0);
        assert_eq!(alert.device.opened, 0);
    }

    #[test]
    fn test_stop_without_start() {
        let mut alert = SirenAlert::new(AlertConfig::default());
        alert.stop();
        assert!(!alert.is_active());
    }
}
