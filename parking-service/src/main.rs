use anyhow::Context;
use parking_service::{Config, FareCalculator, Shell, TicketManager, init_logger_with_file};
use std::io;

fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(work_dir = %config.work_dir, "Parking service starting...");

    // 2. 打开数据库并初始化车位
    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("Failed to create work dir {}", config.work_dir))?;
    let storage = parking_service::core::open_lot(&config)
        .with_context(|| format!("Failed to open {}", config.db_path().display()))?;

    // 3. 启动交互菜单
    let rates = config
        .rate_table()
        .context("Invalid hourly rate in configuration")?;
    let manager = TicketManager::new(storage, FareCalculator::new(rates));
    let stdin = io::stdin();
    Shell::new(manager, stdin.lock(), io::stdout()).run()?;

    tracing::info!("Parking service stopped");
    Ok(())
}
