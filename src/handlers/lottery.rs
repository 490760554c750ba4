use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

use super::today_utc;

#[utoipa::path(
    post,
    path = "/admin/lottery/draw",
    tag = "lottery",
    request_body = DrawRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "抽奖成功", body = DrawResponse),
        (status = 400, description = "无可抽会员或日期无效"),
        (status = 409, description = "奖品已被抽完, 可重试"),
        (status = 500, description = "部分失败: 库存已扣但记录未写入, 需人工核对"),
        (status = 401, description = "未授权")
    )
)]
/// 抽一次奖:
/// 1. 当日已签到且未中奖的会员中等概率抽一人
/// 2. 有库存的奖品按权重抽一个, 条件扣减库存, 冲突自动换奖品重试
/// 3. 写中奖记录并返回当日统计
pub async fn draw(
    service: web::Data<LotteryService>,
    body: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    let date = body.into_inner().date.unwrap_or_else(today_utc);
    match service.draw(&date).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/lottery/winners",
    tag = "lottery",
    params(
        ("date" = Option<String>, Query, description = "会议日期 YYYY-MM-DD (缺省为今天)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取中奖名单成功", body = [WinnerResponse]),
        (status = 401, description = "未授权")
    )
)]
/// 当日中奖名单 (新的在前)
pub async fn get_winners(
    service: web::Data<LotteryService>,
    query: web::Query<WinnerListQuery>,
) -> Result<HttpResponse> {
    let date = query.into_inner().date.unwrap_or_else(today_utc);
    match service.list_winners(&date).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置 (后台)
pub fn lottery_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lottery")
            .route("/draw", web::post().to(draw))
            .route("/winners", web::get().to(get_winners)),
    );
}
