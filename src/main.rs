//! Binary entrypoint: parse the command line, initialize logging, wire the
//! event system together and run until a termination signal or a task death
//! brings the cascade down.

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use framevisor::actuators::{CameraStream, DisplayPower, Notifier, Slideshow};
use framevisor::config::{self, Config};
use framevisor::events::{channel, Event};
use framevisor::gpio;
use framevisor::http::MotionServer;
use framevisor::inputs::{Button, MotionSensor};
use framevisor::power::{self, PowerManager, PowerSchedule};
use framevisor::runtime::{Dispatch, Dispatcher, Supervisor, TaskHandle};
use framevisor::{shutdown, Clock, RuntimeError, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "framevisor", version, about = "Surveillance picture frame controller")]
struct Cli {
    /// Bind address of the HTTP motion endpoint.
    #[arg(long, default_value = config::DEFAULT_LISTEN, value_parser = config::parse_listen_addr)]
    listen: SocketAddr,

    /// Camera stream URL played while the stream is on.
    #[arg(long)]
    stream_url: String,

    /// Directory of slideshow pictures; omit to disable the slideshow.
    #[arg(long)]
    picture_dir: Option<PathBuf>,

    /// Seconds each slideshow picture is shown.
    #[arg(long, default_value_t = config::DEFAULT_SLIDESHOW_INTERVAL)]
    slideshow_interval: u64,

    /// BCM line of the push button.
    #[arg(long)]
    button_gpio: Option<u8>,

    /// BCM line of the PIR motion sensor.
    #[arg(long)]
    motion_gpio: Option<u8>,

    /// Power schedule entry `weekday,HH:MM,HH:MM,MODE`. Repeatable; entries
    /// are evaluated in order and the first match wins.
    #[arg(long = "schedule", value_parser = PowerSchedule::parse)]
    schedules: Vec<PowerSchedule>,

    /// Seconds the display stays on after sensor motion ended.
    #[arg(long, default_value_t = power::DEFAULT_MOTION_HOLD.as_secs())]
    motion_timeout: u64,

    /// Raise the log level to debug.
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stdout.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            listen: self.listen,
            stream_url: self.stream_url,
            picture_dir: self.picture_dir,
            slideshow_interval: Duration::from_secs(self.slideshow_interval),
            button_gpio: self.button_gpio,
            motion_gpio: self.motion_gpio,
            schedules: self.schedules,
            motion_timeout: Duration::from_secs(self.motion_timeout),
            verbose: self.verbose,
            log_file: self.log_file,
        }
    }
}

fn init_tracing(cfg: &Config) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cfg.verbose { "debug" } else { "info" }));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &cfg.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Arc::new(file)).init();
        }
        None => builder.init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cfg = Cli::parse().into_config();

    if let Err(err) = init_tracing(&cfg) {
        eprintln!("cannot open log file: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(cfg).await {
        tracing::error!(error = %err, "fatal error");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<(), RuntimeError> {
    let (tx, rx) = channel();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());

    let notifier = Arc::new(Notifier::new());
    let manager = Arc::new(PowerManager::new(
        tx.clone(),
        Arc::clone(&clock),
        cfg.schedules.clone(),
        cfg.motion_timeout,
    ));

    // Consumer order is delivery order: actuators first, then the notifier,
    // then the manager that produces the next round of control events.
    let mut consumers: Vec<Arc<dyn Dispatch>> = Vec::new();
    if let Some(dir) = &cfg.picture_dir {
        consumers.push(Arc::new(Slideshow::new(dir.clone(), cfg.slideshow_interval)));
    } else {
        tracing::info!("no picture directory configured; slideshow disabled");
    }
    consumers.push(Arc::new(DisplayPower::new()));
    consumers.push(Arc::new(CameraStream::new(cfg.stream_url.clone())));
    consumers.push(Arc::clone(&notifier) as Arc<dyn Dispatch>);
    consumers.push(Arc::clone(&manager) as Arc<dyn Dispatch>);

    let dispatcher = Arc::new(Dispatcher::new(rx, consumers));

    // Input producers only need the sender; GPIO pins must stay alive for the
    // interrupts to keep firing.
    let _button_pin = match cfg.button_gpio {
        Some(line) => Some(gpio::bind_button(
            line,
            Arc::new(Button::new(tx.clone(), Arc::clone(&clock))),
        )?),
        None => None,
    };
    let _motion_pin = match cfg.motion_gpio {
        Some(line) => Some(gpio::bind_motion_sensor(
            line,
            Arc::new(MotionSensor::new(tx.clone())),
        )?),
        None => None,
    };

    let root = CancellationToken::new();
    let dispatcher_handle = TaskHandle::spawn(dispatcher, &root);
    let http_handle = TaskHandle::spawn(Arc::new(MotionServer::new(cfg.listen, tx.clone())), &root);
    let notifier_handle = TaskHandle::spawn(notifier, &root);
    let manager_handle = TaskHandle::spawn(manager, &root);

    let supervisor = Supervisor::new(vec![
        Arc::clone(&dispatcher_handle),
        Arc::clone(&http_handle),
        Arc::clone(&notifier_handle),
        Arc::clone(&manager_handle),
    ]);
    let sup_handle = TaskHandle::spawn(Arc::new(supervisor), &root);
    tracing::info!("framevisor started");

    // Terminate rides the channel so every consumer (actuator children
    // included) sees it before the dispatcher exits; the supervisor then
    // notices the dispatcher's death and cascades to the remaining tasks.
    let signal_tx = tx.clone();
    tokio::spawn(async move {
        if shutdown::wait_for_shutdown_signal().await.is_ok() {
            tracing::info!("termination signal received; shutting down");
            signal_tx.send(Event::Terminate);
        }
    });

    sup_handle.join().await;
    tracing::info!("framevisor stopped");
    Ok(())
}
