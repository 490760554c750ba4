use crate::models::*;
use crate::services::SyncService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/admin/sync/sheets",
    tag = "sync",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "连线成功, 返回试算表标题", body = SheetsTestResponse),
        (status = 502, description = "无法连接 Google Sheets"),
        (status = 401, description = "未授权")
    )
)]
/// 测试 Google Sheets 连线
pub async fn test_sheets(service: web::Data<SyncService>) -> Result<HttpResponse> {
    match service.test_connection().await {
        Ok(data) => {
            let message = format!("成功連接到 Google Sheets: {}", data.title);
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(data, message)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/sync/sheets",
    tag = "sync",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "同步成功, 返回笔数", body = SheetsSyncResponse),
        (status = 502, description = "同步失败"),
        (status = 401, description = "未授权")
    )
)]
/// 将全部会员镜像到 Google Sheets
pub async fn sync_sheets(service: web::Data<SyncService>) -> Result<HttpResponse> {
    match service.sync_members().await {
        Ok(data) => {
            let message = format!("成功同步 {} 筆會員資料到 Google Sheets", data.count);
            Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(data, message)))
        }
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置 (后台)
pub fn sync_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sync")
            .route("/sheets", web::get().to(test_sheets))
            .route("/sheets", web::post().to(sync_sheets)),
    );
}
