use crate::models::*;
use crate::services::{MemberService, SyncService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/members",
    tag = "member",
    responses(
        (status = 200, description = "获取会员列表成功", body = [MemberResponse])
    )
)]
/// 会员列表 (签到页与后台共用, 公开)
pub async fn get_members(service: web::Data<MemberService>) -> Result<HttpResponse> {
    match service.list().await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/members",
    tag = "member",
    request_body = CreateMemberRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "新增会员成功", body = MemberResponse),
        (status = 400, description = "编号已存在或输入无效"),
        (status = 401, description = "未授权")
    )
)]
/// 新增会员 (编号由管理员指定); 成功后背景镜像名单到 Google Sheets
pub async fn create_member(
    service: web::Data<MemberService>,
    sync_service: web::Data<SyncService>,
    body: web::Json<CreateMemberRequest>,
) -> Result<HttpResponse> {
    match service.create(body.into_inner()).await {
        Ok(member) => {
            sync_service.spawn_sync_members();
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": member })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/members/{id}",
    tag = "member",
    request_body = UpdateMemberRequest,
    params(
        ("id" = i64, Path, description = "会员编号")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "更新会员成功", body = MemberResponse),
        (status = 404, description = "会员不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 更新会员; 成功后背景镜像名单到 Google Sheets
pub async fn update_member(
    service: web::Data<MemberService>,
    sync_service: web::Data<SyncService>,
    path: web::Path<i64>,
    body: web::Json<UpdateMemberRequest>,
) -> Result<HttpResponse> {
    match service.update(path.into_inner(), body.into_inner()).await {
        Ok(member) => {
            sync_service.spawn_sync_members();
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": member })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/members/{id}",
    tag = "member",
    params(
        ("id" = i64, Path, description = "会员编号")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "删除会员成功", body = DeleteResult),
        (status = 404, description = "会员不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 删除会员 (连同其签到与中奖记录); 成功后背景镜像名单到 Google Sheets
pub async fn delete_member(
    service: web::Data<MemberService>,
    sync_service: web::Data<SyncService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match service.delete(path.into_inner()).await {
        Ok(result) => {
            sync_service.spawn_sync_members();
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

/// 公开路由
pub fn member_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/members", web::get().to(get_members));
}

/// 后台路由
pub fn member_admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/members")
            .route("", web::post().to(create_member))
            .route("/{id}", web::put().to(update_member))
            .route("/{id}", web::delete().to(delete_member)),
    );
}
