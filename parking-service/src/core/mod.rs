//! 核心模块 - 配置与启动
//!
//! - [`Config`] - 环境变量配置
//! - [`open_lot`] - 打开数据库并初始化车位

pub mod config;

pub use config::Config;

use crate::storage::{LotStorage, StorageResult};

/// Open the lot database and seed the spot pool if the lot is new
pub fn open_lot(config: &Config) -> StorageResult<LotStorage> {
    let storage = LotStorage::open(config.db_path())?;
    storage.seed_spots(&config.spot_pool())?;
    Ok(storage)
}
