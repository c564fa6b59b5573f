mod alerts;
mod clock;
mod config;
mod intent;
mod ui;

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use alarm_core::{AlarmScheduler, TimeSource};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::alerts::SirenAlert;
use crate::clock::LocalClock;
use crate::config::Settings;
use crate::intent::{Intent, UnknownIntent, HELP_TEXT};

#[derive(Clone, Copy, PartialEq, Debug)]
enum Flow {
    Continue,
    Quit,
}

struct AlarmApp<C: TimeSource, W: Write> {
    clock: C,
    scheduler: AlarmScheduler<SirenAlert>,
    out: W,
    snooze_minutes: u32,
    notify: bool,
}

impl<C: TimeSource, W: Write> AlarmApp<C, W> {
    fn new(clock: C, scheduler: AlarmScheduler<SirenAlert>, out: W, settings: &Settings) -> Self {
        Self {
            clock,
            scheduler,
            out,
            snooze_minutes: settings.snooze_minutes,
            notify: settings.alert_config().notification,
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        let now = self.clock.now();
        ui::draw_clock_line(&mut self.out, &now, self.scheduler.config(), self.scheduler.phase())
    }

    fn show_status(&mut self) -> io::Result<()> {
        let now = self.clock.now();
        ui::draw_status(&mut self.out, &now, self.scheduler.config(), self.scheduler.phase())
    }

    fn handle_pump(&mut self) -> io::Result<()> {
        let now = self.clock.now();
        if self.scheduler.tick(&now) {
            ui::draw_ringing(&mut self.out, &now, self.scheduler.config(), self.notify)?;
        }
        self.redraw()
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match line.parse::<Intent>() {
            Ok(intent) => self.handle_intent(intent),
            Err(UnknownIntent(input)) => {
                ui::draw_message(&mut self.out, &format!("Unknown command {input:?}, type help"))?;
                Ok(Flow::Continue)
            }
        }
    }

    fn handle_intent(&mut self, intent: Intent) -> io::Result<Flow> {
        let result = match intent {
            Intent::Arm(None) => {
                let time = self.scheduler.alarm_time();
                self.scheduler.arm_at(time);
                Ok(())
            }
            Intent::Arm(Some(time)) => self.scheduler.arm(&time),
            Intent::Disarm => {
                self.scheduler.disarm();
                Ok(())
            }
            Intent::Toggle => {
                self.scheduler.toggle();
                Ok(())
            }
            Intent::SetTime(time) => self.scheduler.set_time(&time),
            Intent::Label(label) => {
                self.scheduler.set_label(label);
                Ok(())
            }
            Intent::Stop => {
                self.scheduler.stop();
                Ok(())
            }
            Intent::Snooze(minutes) => {
                let minutes = minutes.unwrap_or(self.snooze_minutes);
                if self.scheduler.snooze(minutes).is_none() {
                    ui::draw_message(&mut self.out, "Nothing to snooze")?;
                }
                Ok(())
            }
            Intent::Status => Ok(()),
            Intent::Help => {
                ui::draw_help(&mut self.out, HELP_TEXT)?;
                return Ok(Flow::Continue);
            }
            Intent::Quit => return Ok(Flow::Quit),
        };

        if let Err(e) = result {
            ui::draw_message(&mut self.out, &e.to_string())?;
        }
        self.show_status()?;
        Ok(Flow::Continue)
    }

    fn shutdown(&mut self) -> io::Result<()> {
        if self.scheduler.is_ringing() {
            log::info!("exiting while ringing");
        }
        self.scheduler.stop();
        writeln!(self.out)?;
        self.out.flush()
    }
}

async fn run<C: TimeSource, W: Write>(app: &mut AlarmApp<C, W>, period: Duration) -> io::Result<()> {
    let mut pump = tokio::time::interval(period);
    pump.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    app.show_status()?;
    loop {
        tokio::select! {
            _ = pump.tick() => app.handle_pump()?,
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => {
                    if app.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {
                    // Keep the clock running so an armed alarm still fires
                    log::info!("input closed, Ctrl-C to exit");
                    input_open = false;
                }
                Err(e) => {
                    log::error!("can't read input: {}", e);
                    input_open = false;
                }
            },
            _ = &mut ctrl_c => break,
        }
    }
    app.shutdown()
}

fn main() -> ExitCode {
    let settings = Settings::parse();
    env_logger::Builder::new()
        .filter_level(settings.log_level())
        .parse_default_env()
        .init();
    log::info!("wake-alarm PID is {}", std::process::id());

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("can't start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut alert = SirenAlert::new(settings.alert_config());
    log::debug!("alert config: {:?}", alert.config());
    alert.warm_up();

    let mut scheduler = AlarmScheduler::new(alert);
    scheduler.set_label(settings.label.clone());
    if let Some(time) = settings.at {
        scheduler.arm_at(time);
    }

    let mut app = AlarmApp::new(LocalClock, scheduler, io::stdout(), &settings);
    let code = match runtime.block_on(run(&mut app, settings.tick_period())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("terminal output failed: {}", e);
            app.scheduler.stop();
            ExitCode::FAILURE
        }
    };
    // Don't wait on a stdin read that may never complete
    runtime.shutdown_background();
    code
}
