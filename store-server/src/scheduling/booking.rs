//! 预约协调器
//!
//! 唯一允许写 appointment 行的入口。提交协议：
//!
//! 1. 校验营业日 + 槽位在生成网格上（`InvalidSlot`）
//! 2. 拒绝门店本地时间已过去的槽位（`SlotInPast`）
//! 3. 取该槽位的互斥锁，事务内重读计数并插入 — 关闭
//!    「读容量」和「写预约」之间的竞态窗口
//! 4. 成功后在同一事务内标记订单已有预约
//!
//! 锁的持有范围是单次预约尝试，不跨请求；不同槽位互不竞争。

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use sqlx::SqlitePool;
use tracing::info;

use super::{ScheduleError, ScheduleResult, SlotLocks, calendar, slots};
use crate::db::repository::{RepoError, appointment, order};
use crate::utils::time::{format_date, format_time, slot_in_past};
use shared::models::{Appointment, AppointmentStatus};

/// Booking Coordinator — transactional entry point for slot reservation
#[derive(Clone)]
pub struct BookingCoordinator {
    pool: SqlitePool,
    locks: SlotLocks,
    tz: Tz,
}

impl BookingCoordinator {
    pub fn new(pool: SqlitePool, locks: SlotLocks, tz: Tz) -> Self {
        Self { pool, locks, tz }
    }

    /// Book a slot for an order. At most `capacity_per_slot` concurrent
    /// non-cancelled appointments per (store, date, time), even when
    /// callers race.
    pub async fn book(
        &self,
        store_id: i64,
        order_number: &str,
        date: NaiveDate,
        time: NaiveTime,
        observacoes: Option<&str>,
    ) -> ScheduleResult<Appointment> {
        let date_str = format_date(date);
        let time_str = format_time(time);

        let config = calendar::load_config(&self.pool, store_id).await?;
        if !slots::slots_for_config(&config, date)?.contains(&time) {
            return Err(ScheduleError::InvalidSlot {
                date: date_str,
                time: time_str,
            });
        }
        if slot_in_past(date, time, self.tz) {
            return Err(ScheduleError::SlotInPast {
                date: date_str,
                time: time_str,
            });
        }

        let order = order::find_by_number(&self.pool, store_id, order_number)
            .await?
            .ok_or_else(|| ScheduleError::OrderNotFound(order_number.to_string()))?;

        // Serialized check-and-increment. The lock closes the window
        // between the capacity read and the insert; the transaction makes
        // the re-checks, the insert and the order flag one atomic unit.
        // WAL aborts any writer whose read snapshot went stale, so the
        // in-transaction checks hold across slots too.
        let lock = self.locks.lock_for(store_id, &date_str, &time_str);
        let _guard = lock.lock().await;

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;

        let booked =
            appointment::count_active_for_slot(&mut *tx, store_id, &date_str, &time_str).await?;
        if booked >= config.capacity_per_slot {
            return Err(ScheduleError::SlotFull {
                date: date_str,
                time: time_str,
            });
        }
        if appointment::find_active_by_order(&mut *tx, order.id)
            .await?
            .is_some()
        {
            return Err(ScheduleError::OrderAlreadyBooked(order_number.to_string()));
        }

        let appt = appointment::insert_confirmed(
            &mut *tx,
            store_id,
            order.id,
            order.client_id,
            &date_str,
            &time_str,
            observacoes,
        )
        .await?;
        order::set_has_appointment(&mut *tx, order.id, true).await?;

        tx.commit().await.map_err(RepoError::from)?;

        info!(
            store_id,
            order_number,
            date = %date_str,
            time = %time_str,
            appointment_id = appt.id,
            "Appointment booked"
        );
        Ok(appt)
    }

    /// Cancel an appointment. Idempotent: cancelling an already-cancelled
    /// appointment returns the terminal state without recording a second
    /// transition. Frees slot capacity immediately.
    pub async fn cancel(&self, store_id: i64, id: i64) -> ScheduleResult<Appointment> {
        let appt = self.load(store_id, id).await?;
        match appt.status {
            AppointmentStatus::Cancelado => Ok(appt),
            AppointmentStatus::Concluido => Err(ScheduleError::InvalidTransition {
                id,
                current: appt.status,
                requested: AppointmentStatus::Cancelado,
            }),
            AppointmentStatus::Confirmado => {
                let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
                let changed = appointment::transition_status(
                    &mut *tx,
                    store_id,
                    id,
                    AppointmentStatus::Confirmado,
                    AppointmentStatus::Cancelado,
                )
                .await?;
                if changed {
                    order::set_has_appointment(&mut *tx, appt.order_id, false).await?;
                }
                tx.commit().await.map_err(RepoError::from)?;

                if changed {
                    info!(store_id, appointment_id = id, "Appointment cancelled");
                    self.load(store_id, id).await
                } else {
                    // Raced with another transition; the re-read decides
                    self.settle_race(store_id, id, AppointmentStatus::Cancelado)
                        .await
                }
            }
        }
    }

    /// Mark an appointment as done (`confirmado → concluido`).
    /// Completing an already-completed appointment returns the terminal
    /// state; a cancelled appointment cannot be completed.
    pub async fn complete(&self, store_id: i64, id: i64) -> ScheduleResult<Appointment> {
        let appt = self.load(store_id, id).await?;
        match appt.status {
            AppointmentStatus::Concluido => Ok(appt),
            AppointmentStatus::Cancelado => Err(ScheduleError::InvalidTransition {
                id,
                current: appt.status,
                requested: AppointmentStatus::Concluido,
            }),
            AppointmentStatus::Confirmado => {
                let changed = appointment::transition_status(
                    &self.pool,
                    store_id,
                    id,
                    AppointmentStatus::Confirmado,
                    AppointmentStatus::Concluido,
                )
                .await?;
                if changed {
                    info!(store_id, appointment_id = id, "Appointment completed");
                    self.load(store_id, id).await
                } else {
                    self.settle_race(store_id, id, AppointmentStatus::Concluido)
                        .await
                }
            }
        }
    }

    async fn load(&self, store_id: i64, id: i64) -> ScheduleResult<Appointment> {
        appointment::find_by_id(&self.pool, store_id, id)
            .await?
            .ok_or(ScheduleError::AppointmentNotFound(id))
    }

    /// After a guarded transition matched zero rows, re-read and decide:
    /// same terminal state → idempotent success, anything else → invalid.
    async fn settle_race(
        &self,
        store_id: i64,
        id: i64,
        requested: AppointmentStatus,
    ) -> ScheduleResult<Appointment> {
        let appt = self.load(store_id, id).await?;
        if appt.status == requested {
            Ok(appt)
        } else {
            Err(ScheduleError::InvalidTransition {
                id,
                current: appt.status,
                requested,
            })
        }
    }
}
