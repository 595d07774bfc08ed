use crate::pricing::{BIKE_RATE_PER_HOUR, CAR_RATE_PER_HOUR, FareResult, RateTable};
use shared::models::VehicleCategory;
use std::path::PathBuf;

/// 服务配置 - 停车场的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (数据库文件) |
/// | DB_FILE | parking.redb | 数据库文件名 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 设置后按天滚动写入日志文件 |
/// | CAR_SPOTS | 3 | 空库初始化时的汽车车位数 |
/// | BIKE_SPOTS | 2 | 空库初始化时的摩托车车位数 |
/// | CAR_RATE_PER_HOUR | 1.5 | 汽车每小时费率 |
/// | BIKE_RATE_PER_HOUR | 1.0 | 摩托车每小时费率 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/parking CAR_SPOTS=20 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库文件
    pub work_dir: String,
    /// 数据库文件名
    pub db_file: String,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 日志目录 (可选)
    pub log_dir: Option<String>,
    /// 初始汽车车位数
    pub car_spots: u32,
    /// 初始摩托车车位数
    pub bike_spots: u32,
    /// 汽车每小时费率
    pub car_rate_per_hour: f64,
    /// 摩托车每小时费率
    pub bike_rate_per_hour: f64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            db_file: std::env::var("DB_FILE").unwrap_or_else(|_| "parking.redb".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            car_spots: std::env::var("CAR_SPOTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            bike_spots: std::env::var("BIKE_SPOTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            car_rate_per_hour: std::env::var("CAR_RATE_PER_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(CAR_RATE_PER_HOUR),
            bike_rate_per_hour: std::env::var("BIKE_RATE_PER_HOUR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(BIKE_RATE_PER_HOUR),
        }
    }

    /// Full path of the database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.db_file)
    }

    /// Spot pool seeded into an empty lot
    pub fn spot_pool(&self) -> Vec<(VehicleCategory, u32)> {
        vec![
            (VehicleCategory::Car, self.car_spots),
            (VehicleCategory::Bike, self.bike_spots),
        ]
    }

    /// Rate table fixed for the lifetime of the process
    ///
    /// 费率必须是非负有限数 (NaN / 负数启动即报错)
    pub fn rate_table(&self) -> FareResult<RateTable> {
        RateTable::new([
            (VehicleCategory::Car, self.car_rate_per_hour),
            (VehicleCategory::Bike, self.bike_rate_per_hour),
        ])
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
