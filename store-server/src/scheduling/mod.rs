//! 预约调度核心
//!
//! 四个组件，自底向上：
//!
//! - [`calendar`] - 营业日历：门店营业日/时段配置
//! - [`slots`] - 槽位生成：从营业时段枚举可预约时间
//! - [`ledger`] - 容量台账：按 (store, date, time) 统计已预约数
//! - [`booking`] - 预约协调器：原子的检查-占位提交
//!
//! 读路径（availability）只是建议性的，可能读到过期数据；
//! 写路径（book）在槽位锁 + 事务内重新校验，是唯一权威。

pub mod booking;
pub mod calendar;
pub mod ledger;
pub mod slots;

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::db::repository::RepoError;
use shared::models::AppointmentStatus;

pub use booking::BookingCoordinator;
pub use calendar::OperatingWindow;

/// Scheduling error taxonomy
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Store has no schedule configuration — setup error, surfaced to
    /// administrators, not retryable
    #[error("Store {0} has no schedule configuration")]
    ConfigNotFound(i64),

    /// Requested time is off the generated grid or the day is not an
    /// operating day — client input error
    #[error("{time} on {date} is not a bookable slot")]
    InvalidSlot { date: String, time: String },

    /// Requested slot already started in store-local time
    #[error("Slot {date} {time} is in the past")]
    SlotInPast { date: String, time: String },

    /// Capacity exhausted, possibly by a concurrent winner — re-fetch
    /// availability and pick another slot
    #[error("Slot {date} {time} is fully booked")]
    SlotFull { date: String, time: String },

    #[error("Order {0} not found")]
    OrderNotFound(String),

    #[error("Order {0} already has an active appointment")]
    OrderAlreadyBooked(String),

    #[error("Appointment {0} not found")]
    AppointmentNotFound(i64),

    /// Terminal states admit no further transition
    #[error("Appointment {id} is {current} and cannot become {requested}")]
    InvalidTransition {
        id: i64,
        current: AppointmentStatus,
        requested: AppointmentStatus,
    },

    /// Transient storage failure — safe to retry the whole attempt, the
    /// atomic unit leaves no partial state
    #[error(transparent)]
    Storage(#[from] RepoError),
}

/// Result type for scheduling operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Slot identity: (store_id, date, time)
type SlotKey = (i64, String, String);

/// 槽位互斥锁表
///
/// 同一槽位的并发预约串行化；不同槽位互不阻塞。
/// 作为依赖注入进 [`BookingCoordinator`]，不是模块级单例，
/// 协调器因此可以在测试中独立构造。
#[derive(Clone, Default)]
pub struct SlotLocks {
    locks: Arc<DashMap<SlotKey, Arc<Mutex<()>>>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Mutex for one slot. Entries are never evicted; the map is bounded
    /// by the number of distinct slots that ever saw a booking attempt.
    pub fn lock_for(&self, store_id: i64, date: &str, time: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry((store_id, date.to_string(), time.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
