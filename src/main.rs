//! Vehicle skeleton app — main entry point.
//!
//! Hexagonal architecture with one service task owning all state.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ConsoleBus        SimulatedBroker   FileConfigAdapter         │
//! │  (MessageBusPort)  (SignalPort)      (ConfigPort)              │
//! │  stdin thread      aux-serial thread                           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Dispatcher · RuleTable · SeatTracker                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Timer task: Scheduler ─▶ INBOX ─▶ Service task                │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::io::Write;

use anyhow::Result;
use embassy_time::Duration;
use log::{error, info, warn};

use vehicle_skeleton::adapters::config_file::FileConfigAdapter;
use vehicle_skeleton::adapters::console_bus::{self, ConsoleBus};
use vehicle_skeleton::adapters::sim_broker::{SIM_INJECT, SimulatedBroker};
use vehicle_skeleton::app::channels::{INBOX, InboxDelegate};
use vehicle_skeleton::app::ports::{ConfigError, ConfigPort};
use vehicle_skeleton::app::service::AppService;
use vehicle_skeleton::config::AppConfig;
use vehicle_skeleton::link::{self, channels::AUX_FRAMES};
use vehicle_skeleton::scheduler::{self, Scheduler};

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    info!("Starting vehicle-skeleton v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match FileConfigAdapter::from_env().load() {
        Ok(config) => config,
        Err(ConfigError::NotFound) => {
            info!("No config file, using defaults");
            AppConfig::default()
        }
        Err(e) => {
            warn!("Config load failed ({}), using defaults", e);
            AppConfig::default()
        }
    };

    // ── 3. Input threads ──────────────────────────────────────
    if config.serial.enabled {
        match link::io_task::spawn(&config.serial, &AUX_FRAMES) {
            Ok(_) => info!("AUX link on {} @ {}", config.serial.device, config.serial.baud_rate),
            Err(e) => error!("AUX link disabled: {}", e),
        }
    } else {
        info!("AUX link disabled by config");
    }
    console_bus::spawn_stdin_reader(&INBOX, &SIM_INJECT)?;

    // ── 4. Adapters + service ─────────────────────────────────
    let bus = ConsoleBus::new();
    let broker = SimulatedBroker::new(&INBOX);
    let service = AppService::new(config.clone());
    service.start(&broker);

    let mut sched = Scheduler::from_config(&config);
    let mut delegate = InboxDelegate::new(&INBOX);
    let base_tick = Duration::from_millis(config.poll_interval_ms);

    // ── 5. Tasks ──────────────────────────────────────────────
    let executor: edge_executor::LocalExecutor<'_, 8> = edge_executor::LocalExecutor::new();
    executor
        .spawn(async move { scheduler::run(&mut sched, base_tick, &mut delegate).await })
        .detach();
    executor.spawn(broker.serve_injections(&SIM_INJECT)).detach();
    executor
        .spawn(service.run(&INBOX, &AUX_FRAMES, &broker, &bus))
        .detach();

    info!("Tasks started (timer tick {} ms)", config.poll_interval_ms);
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
    Ok(())
}
