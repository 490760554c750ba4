use crate::models::*;
use crate::services::MeetingService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/meetings",
    tag = "meeting",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取会议列表成功", body = [MeetingResponse]),
        (status = 401, description = "未授权")
    )
)]
/// 会议列表 (日期倒序)
pub async fn get_meetings(service: web::Data<MeetingService>) -> Result<HttpResponse> {
    match service.list().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/meetings",
    tag = "meeting",
    request_body = UpsertMeetingRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "创建/更新会议成功", body = MeetingResponse),
        (status = 400, description = "日期格式错误"),
        (status = 401, description = "未授权")
    )
)]
/// 以日期为准创建会议, 已存在则更新状态
pub async fn upsert_meeting(
    service: web::Data<MeetingService>,
    body: web::Json<UpsertMeetingRequest>,
) -> Result<HttpResponse> {
    match service.upsert(body.into_inner()).await {
        Ok(meeting) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": meeting }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/meetings/{id}",
    tag = "meeting",
    request_body = UpdateMeetingRequest,
    params(
        ("id" = i64, Path, description = "会议ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新会议成功", body = MeetingResponse),
        (status = 404, description = "会议不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 按 ID 更新会议日期 / 状态
pub async fn update_meeting(
    service: web::Data<MeetingService>,
    path: web::Path<i64>,
    body: web::Json<UpdateMeetingRequest>,
) -> Result<HttpResponse> {
    match service.update(path.into_inner(), body.into_inner()).await {
        Ok(meeting) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": meeting }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/meetings/{id}",
    tag = "meeting",
    params(
        ("id" = i64, Path, description = "会议ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除会议成功"),
        (status = 404, description = "会议不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 删除会议 (连同该日期的签到记录)
pub async fn delete_meeting(
    service: web::Data<MeetingService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置 (后台)
pub fn meeting_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/meetings")
            .route("", web::get().to(get_meetings))
            .route("", web::post().to(upsert_meeting))
            .route("/{id}", web::put().to(update_meeting))
            .route("/{id}", web::delete().to(delete_meeting)),
    );
}
