//! Parking Service - 停车场票据与计费
//!
//! # 架构概述
//!
//! - **计费** (`pricing`): 按时计费，前半小时免费，回头客 95 折
//! - **停车** (`parking`): 车位分配与票据生命周期 (入场 → 出场)
//! - **存储** (`storage`): 嵌入式 redb 存储
//! - **交互** (`shell`): 文本菜单
//!
//! # 模块结构
//!
//! ```text
//! parking-service/src/
//! ├── core/          # 配置、启动
//! ├── pricing/       # 费率表与计费
//! ├── parking/       # 车位分配、票据管理
//! ├── storage/       # 存储接口与 redb 实现
//! ├── utils/         # 日志
//! └── shell.rs       # 交互菜单
//! ```

pub mod core;
pub mod parking;
pub mod pricing;
pub mod shell;
pub mod storage;
pub mod utils;

// Re-export 公共类型
pub use crate::core::Config;
pub use parking::{ParkingEntry, ParkingError, ParkingResult, SpotAllocator, TicketManager};
pub use pricing::{FareCalculator, FareError, RateTable};
pub use shell::Shell;
pub use storage::{LotStorage, ParkingStore, StorageError, StorageResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;
