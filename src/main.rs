mod config;
mod detection;
mod device;
mod display;
mod error;
mod logger;
mod mission;
mod position;
mod sensors;
mod telemetry;
mod types;
mod utils;

use dotenv::dotenv;
use log::{error, info};
use std::env;
use std::path::Path;

use config::{ConfigError, MissionConfig};
use device::{SimulatedDisplay, SimulatedSensors};
use mission::{Clock, MissionLoop, SystemClock};
use position::CircularOrbit;
use telemetry::TelemetryLog;

fn main() {
    dotenv().ok(); // 加载 .env 文件

    // 日志初始化之前只能写 stderr
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid mission configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = logger::init_logger(config.get_log_path().as_deref()) {
        eprintln!("Failed to open the diagnostic log: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        error!("Mission failed to start: {}", e);
        std::process::exit(1);
    }
}

/// `MISSION_CONFIG` names the config file. A missing file is created with
/// the defaults; without the variable the defaults are used as-is.
fn load_config() -> Result<MissionConfig, ConfigError> {
    let config = match env::var("MISSION_CONFIG") {
        Ok(path) if Path::new(&path).exists() => MissionConfig::load_from_file(&path)?,
        Ok(path) => {
            let config = MissionConfig::default();
            config.save_to_file(&path)?;
            config
        }
        Err(_) => MissionConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(config: &MissionConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Application starting");

    let clock = SystemClock;
    let log = TelemetryLog::initialize(config.get_data_path())?;

    let mut mission = MissionLoop::new(
        SimulatedSensors::new(&config.simulation),
        SimulatedDisplay::new(clock),
        CircularOrbit::iss(clock.now(), 0.0),
        log,
        clock,
        config.simulation.heartbeat_rng(),
        config,
    );

    if config.display.show_splash {
        mission.splash();
    }

    let summary = mission.run();
    info!(
        "{} of {} iterations completed, final state {:?}, last counter {}",
        summary.iterations - summary.failed_iterations,
        summary.iterations,
        mission.state(),
        mission.sequence() - 1
    );

    Ok(())
}
