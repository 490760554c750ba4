use crate::models::*;
use crate::services::PrizeService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/prizes",
    tag = "prize",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取奖品列表成功", body = [PrizeResponse]),
        (status = 401, description = "未授权")
    )
)]
/// 奖品列表 (含库存与权重配置)
pub async fn get_prizes(service: web::Data<PrizeService>) -> Result<HttpResponse> {
    match service.list().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/prizes",
    tag = "prize",
    request_body = CreatePrizeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "新增奖品成功", body = PrizeResponse),
        (status = 400, description = "输入无效"),
        (status = 401, description = "未授权")
    )
)]
/// 新增奖品, 剩余数量以总数量初始化
pub async fn create_prize(
    service: web::Data<PrizeService>,
    body: web::Json<CreatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.create(body.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/prizes/{id}",
    tag = "prize",
    request_body = UpdatePrizeRequest,
    params(
        ("id" = i64, Path, description = "奖品ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新奖品成功", body = PrizeResponse),
        (status = 404, description = "奖品不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 更新奖品; 总数量变化时剩余数量按已抽走数重算
pub async fn update_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
    body: web::Json<UpdatePrizeRequest>,
) -> Result<HttpResponse> {
    match service.update(path.into_inner(), body.into_inner()).await {
        Ok(prize) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prize }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/prizes/{id}",
    tag = "prize",
    params(
        ("id" = i64, Path, description = "奖品ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除奖品成功"),
        (status = 404, description = "奖品不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 删除奖品 (历史中奖记录保留)
pub async fn delete_prize(
    service: web::Data<PrizeService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.delete(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置 (后台)
pub fn prize_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prizes")
            .route("", web::get().to(get_prizes))
            .route("", web::post().to(create_prize))
            .route("/{id}", web::put().to(update_prize))
            .route("/{id}", web::delete().to(delete_prize)),
    );
}
