use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 任务配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MissionConfig {
    pub mission: ScheduleConfig,
    pub detection: DetectionConfig,
    pub display: DisplayConfig,
    pub files: FilesConfig,
    pub simulation: SimulationConfig,
}

/// 任务时序配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    pub duration_minutes: f64,
    /// Sleep after a quiet iteration.
    pub nominal_sleep_seconds: f64,
    /// Sleep after an iteration that raised a deviation alert.
    pub alert_sleep_seconds: f64,
    /// Fixed delay after the counter advances.
    pub secondary_sleep_seconds: f64,
}

/// 加速度偏差检测配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    pub threshold: f64,
}

/// LED 矩阵显示配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_splash: bool,
    pub splash_hold_seconds: f64,
    pub splash_message: String,
    pub splash_scroll_speed: f64,
    pub splash_colour: [u8; 3],
    pub motion_hold_seconds: f64,
    pub alert_message: String,
    pub alert_scroll_speed: f64,
    pub alert_colour: [u8; 3],
}

/// 输出文件配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilesConfig {
    pub data_file: String,
    pub log_file: String,
}

/// 模拟传感器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: Option<u64>,
    /// Probability that any single sensor query fails.
    pub fault_rate: f64,
    pub motion_probability: f64,
    /// Peak accelerometer jitter per read, in g.
    pub vibration_amplitude: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 175.0,
            nominal_sleep_seconds: 2.0,
            alert_sleep_seconds: 0.0,
            secondary_sleep_seconds: 2.0,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: crate::detection::baseline::DEFAULT_THRESHOLD,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_splash: true,
            splash_hold_seconds: 1.0,
            splash_message: "Program Start".to_string(),
            splash_scroll_speed: 0.09,
            splash_colour: [0, 0, 155],   // 蓝色
            motion_hold_seconds: 1.0,
            alert_message: "ISS Motion detected".to_string(),
            alert_scroll_speed: 0.04,
            alert_colour: [155, 0, 0],    // 红色
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            data_file: "data.csv".to_string(),
            log_file: "mission.log".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fault_rate: 0.0,
            motion_probability: 0.02,
            vibration_amplitude: 0.004,
        }
    }
}

/// 任务时长上限（30 天）
pub const MAX_DURATION_MINUTES: f64 = 30.0 * 24.0 * 60.0;
/// 单次休眠/停留上限（1 小时）
pub const MAX_SLEEP_SECONDS: f64 = 3600.0;
/// 滚动速度上限，秒/列
pub const MAX_SCROLL_SPEED: f64 = 1.0;

/// Out-of-range values saturate to zero; `validate` rejects them first.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

impl ScheduleConfig {
    pub fn duration(&self) -> chrono::Duration {
        chrono::Duration::try_milliseconds((self.duration_minutes * 60_000.0) as i64)
            .unwrap_or_else(chrono::Duration::zero)
    }

    pub fn nominal_sleep(&self) -> Duration {
        seconds(self.nominal_sleep_seconds)
    }

    pub fn alert_sleep(&self) -> Duration {
        seconds(self.alert_sleep_seconds)
    }

    pub fn secondary_sleep(&self) -> Duration {
        seconds(self.secondary_sleep_seconds)
    }
}

impl DisplayConfig {
    pub fn splash_hold(&self) -> Duration {
        seconds(self.splash_hold_seconds)
    }

    pub fn motion_hold(&self) -> Duration {
        seconds(self.motion_hold_seconds)
    }
}

impl SimulationConfig {
    /// RNG for the simulated sensor board.
    pub fn sensor_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// RNG for the heartbeat pixel, seeded one past the board.
    pub fn heartbeat_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_os_rng(),
        }
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{} must be within [{}, {}], got {}",
            name, min, max, value
        )))
    }
}

impl MissionConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e))?;

        let config: MissionConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::IoError(e))?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.mission;
        check_range("duration_minutes", m.duration_minutes, 0.0, MAX_DURATION_MINUTES)?;

        for (name, value) in [
            ("nominal_sleep_seconds", m.nominal_sleep_seconds),
            ("alert_sleep_seconds", m.alert_sleep_seconds),
            ("secondary_sleep_seconds", m.secondary_sleep_seconds),
            ("splash_hold_seconds", self.display.splash_hold_seconds),
            ("motion_hold_seconds", self.display.motion_hold_seconds),
        ] {
            check_range(name, value, 0.0, MAX_SLEEP_SECONDS)?;
        }

        if !(self.detection.threshold > 0.0) || !self.detection.threshold.is_finite() {
            return Err(ConfigError::ValidationError("Deviation threshold must be positive".to_string()));
        }

        for (name, value) in [
            ("splash_scroll_speed", self.display.splash_scroll_speed),
            ("alert_scroll_speed", self.display.alert_scroll_speed),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::ValidationError(format!("{} must be positive", name)));
            }
            check_range(name, value, 0.0, MAX_SCROLL_SPEED)?;
        }

        let sim = &self.simulation;
        check_range("fault_rate", sim.fault_rate, 0.0, 1.0)?;
        check_range("motion_probability", sim.motion_probability, 0.0, 1.0)?;
        check_range("vibration_amplitude", sim.vibration_amplitude, 0.0, 1.0)?;

        if self.files.data_file.is_empty() {
            return Err(ConfigError::ValidationError("Data file path must not be empty".to_string()));
        }

        Ok(())
    }

    /// 获取数据文件路径
    pub fn get_data_path(&self) -> PathBuf {
        PathBuf::from(&self.files.data_file)
    }

    /// 获取日志文件路径
    pub fn get_log_path(&self) -> Option<PathBuf> {
        if self.files.log_file.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.files.log_file))
        }
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
