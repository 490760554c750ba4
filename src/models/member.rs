use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::member_entity;

/// 新增会员请求 (编号由管理员指定, 与线下名册一致)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMemberRequest {
    /// 会员编号 (正整数)
    pub id: i64,
    /// 会员姓名 (1-100 字符)
    pub name: String,
    /// 专业别 (最长 200 字符)
    pub profession: Option<String>,
}

/// 更新会员请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMemberRequest {
    pub name: String,
    pub profession: Option<String>,
}

/// 会员信息响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberResponse {
    pub id: i64,
    pub name: String,
    pub profession: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<member_entity::Model> for MemberResponse {
    fn from(m: member_entity::Model) -> Self {
        MemberResponse {
            id: m.id,
            name: m.name,
            profession: m.profession,
            created_at: m.created_at,
        }
    }
}

/// 删除结果 (deleted 表示确实删除了记录)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteResult {
    pub deleted: bool,
}
