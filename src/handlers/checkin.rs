use crate::models::*;
use crate::services::CheckinService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::today_utc;

#[utoipa::path(
    post,
    path = "/checkin",
    tag = "checkin",
    request_body = CheckinRequest,
    responses(
        (status = 200, description = "签到成功"),
        (status = 400, description = "输入无效"),
        (status = 404, description = "会员不存在")
    )
)]
/// 签到 (公开):
/// 1. 当日会议不存在则自动建立
/// 2. 重复签到按更新处理
pub async fn check_in(
    service: web::Data<CheckinService>,
    body: web::Json<CheckinRequest>,
) -> Result<HttpResponse> {
    match service.check_in(body.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/checkins",
    tag = "checkin",
    params(
        ("date" = Option<String>, Query, description = "会议日期 YYYY-MM-DD (缺省为今天)")
    ),
    responses(
        (status = 200, description = "获取签到列表成功", body = CheckinListResponse)
    )
)]
/// 当日会议与签到列表 (公开, 签到墙轮询用)
pub async fn get_checkins(
    service: web::Data<CheckinService>,
    query: web::Query<CheckinListQuery>,
) -> Result<HttpResponse> {
    let date = query.into_inner().date.unwrap_or_else(today_utc);
    match service.list_by_date(&date).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/checkin/delete",
    tag = "checkin",
    request_body = DeleteCheckinRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除签到成功", body = DeleteResult),
        (status = 401, description = "未授权")
    )
)]
/// 删除一条签到记录
pub async fn delete_checkin(
    service: web::Data<CheckinService>,
    body: web::Json<DeleteCheckinRequest>,
) -> Result<HttpResponse> {
    match service.delete(body.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 公开路由
pub fn checkin_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkin", web::post().to(check_in))
        .route("/checkins", web::get().to(get_checkins));
}

/// 后台路由
pub fn checkin_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/checkin/delete", web::post().to(delete_checkin));
}
