//! Appointment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::appointment;
use crate::utils::validation::{
    MAX_NOTE_LEN, MAX_ORDER_NUMBER_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use crate::utils::time;
use shared::models::{Appointment, AppointmentCreate, AppointmentStatus, AppointmentUpdate};

/// Query params for listing appointments (single date or range)
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/stores/:store_id/appointments - 预约列表 (管理端)
pub async fn list(
    State(state): State<ServerState>,
    Path(store_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let appointments = if let Some(date) = query.date {
        time::parse_date(&date)?;
        appointment::find_by_date(&state.pool, store_id, &date).await?
    } else if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        time::parse_date(&start)?;
        time::parse_date(&end)?;
        appointment::find_by_date_range(&state.pool, store_id, &start, &end).await?
    } else {
        return Err(AppError::validation(
            "Provide either date or start_date and end_date",
        ));
    };

    Ok(Json(appointments))
}

/// GET /api/stores/:store_id/appointments/:id - 获取单个预约
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path((store_id, id)): Path<(i64, i64)>,
) -> AppResult<Json<Appointment>> {
    let appt = appointment::find_by_id(&state.pool, store_id, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Appointment {id} not found")))?;
    Ok(Json(appt))
}

/// POST /api/stores/:store_id/appointments - 创建预约 (公开预约流程)
///
/// 槽位满时返回 409，区别于一般服务器错误；调用方应重新查询
/// availability 换槽位，而不是盲目重试同一槽位。
pub async fn create(
    State(state): State<ServerState>,
    Path(store_id): Path<i64>,
    Json(payload): Json<AppointmentCreate>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    validate_required_text(&payload.order_number, "order_number", MAX_ORDER_NUMBER_LEN)?;
    validate_optional_text(&payload.observacoes, "observacoes", MAX_NOTE_LEN)?;
    let date = time::parse_date(&payload.date)?;
    let slot_time = time::parse_time(&payload.time)?;

    let appt = state
        .booking
        .book(
            store_id,
            &payload.order_number,
            date,
            slot_time,
            payload.observacoes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(appt)))
}

/// PUT /api/stores/:store_id/appointments/:id - 更新/取消预约 (管理端)
///
/// status 为 cancelado 走取消（幂等），concluido 走完成；
/// observacoes 可单独更新。
pub async fn update(
    State(state): State<ServerState>,
    Path((store_id, id)): Path<(i64, i64)>,
    Json(payload): Json<AppointmentUpdate>,
) -> AppResult<Json<Appointment>> {
    validate_optional_text(&payload.observacoes, "observacoes", MAX_NOTE_LEN)?;
    if payload.status.is_none() && payload.observacoes.is_none() {
        return Err(AppError::validation("Nothing to update"));
    }

    if let Some(observacoes) = &payload.observacoes {
        let found =
            appointment::update_observacoes(&state.pool, store_id, id, Some(observacoes)).await?;
        if !found {
            return Err(AppError::not_found(format!("Appointment {id} not found")));
        }
    }

    let appt = match payload.status {
        Some(AppointmentStatus::Cancelado) => state.booking.cancel(store_id, id).await?,
        Some(AppointmentStatus::Concluido) => state.booking.complete(store_id, id).await?,
        Some(AppointmentStatus::Confirmado) => {
            return Err(AppError::validation(
                "Appointments cannot be moved back to confirmado",
            ));
        }
        None => appointment::find_by_id(&state.pool, store_id, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Appointment {id} not found")))?,
    };

    Ok(Json(appt))
}
