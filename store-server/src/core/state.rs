use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::scheduling::{BookingCoordinator, SlotLocks};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 语义的浅拷贝（pool 与锁表内部都是 Arc），
/// 每个请求 handler 克隆成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | booking | BookingCoordinator | 预约协调器 (槽位锁已注入) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// 预约协调器
    pub booking: BookingCoordinator,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替
    pub fn new(config: Config, pool: SqlitePool, booking: BookingCoordinator) -> Self {
        Self {
            config,
            pool,
            booking,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/store.db，自动迁移)
    /// 3. 预约协调器（注入独立的槽位锁表）
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("store.db");
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let booking = BookingCoordinator::new(db.pool.clone(), SlotLocks::new(), config.timezone);

        Ok(Self::new(config.clone(), db.pool, booking))
    }
}
