use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 管理员登录请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// 管理员登录响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub access_token: String,
    /// 秒
    pub expires_in: i64,
}

/// Google Sheets 同步结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SheetsSyncResponse {
    /// 同步的会员笔数
    pub count: usize,
}

/// Google Sheets 连线测试结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SheetsTestResponse {
    pub title: String,
}
