use crate::models::*;
use crate::services::AuthService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "登录成功", body = AdminLoginResponse),
        (status = 401, description = "密码错误")
    )
)]
/// 管理员登录, 成功返回访问令牌
pub async fn login(
    service: web::Data<AuthService>,
    body: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse> {
    match service.login(body.into_inner()) {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").route("/login", web::post().to(login)));
}
