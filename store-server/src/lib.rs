//! Pitstop Store Server - 轮胎连锁门店电商/管理后端
//!
//! # 架构概述
//!
//! 本模块是门店服务的主入口，核心是预约槽位调度：
//!
//! - **调度核心** (`scheduling`): 营业日历 → 槽位生成 → 容量台账 → 预约协调器
//! - **数据库** (`db`): SQLite (sqlx) 存储与 function-style repository
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── scheduling/    # 预约调度核心
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod scheduling;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use scheduling::{BookingCoordinator, ScheduleError, SlotLocks};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置进程环境：dotenv + 日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____  _ __       __
   / __ \(_) /______/ /_____  ____
  / /_/ / / __/ ___/ __/ __ \/ __ \
 / ____/ / /_(__  ) /_/ /_/ / /_/ /
/_/   /_/\__/____/\__/\____/ .___/
                          /_/
    "#
    );
}
