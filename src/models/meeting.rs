use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{MeetingStatus, meeting_entity};

/// 创建/更新会议请求 (以日期为准, 已存在则更新状态)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpsertMeetingRequest {
    /// 会议日期 (YYYY-MM-DD)
    pub date: String,
    /// 缺省为 scheduled
    pub status: Option<MeetingStatus>,
}

/// 按 ID 更新会议请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateMeetingRequest {
    pub date: String,
    pub status: Option<MeetingStatus>,
}

/// 会议响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeetingResponse {
    pub id: i64,
    pub date: String,
    pub status: MeetingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<meeting_entity::Model> for MeetingResponse {
    fn from(m: meeting_entity::Model) -> Self {
        MeetingResponse {
            id: m.id,
            date: m.date,
            status: m.status,
            created_at: m.created_at,
        }
    }
}
