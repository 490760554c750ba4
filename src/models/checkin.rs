use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::{CheckinStatus, checkin_entity};

use super::MeetingResponse;

/// 签到请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckinRequest {
    pub member_id: i64,
    /// 会议日期 (YYYY-MM-DD)
    pub date: String,
    /// 签到留言 (最长 500 字符)
    pub message: Option<String>,
    /// 缺省为 present
    pub status: Option<CheckinStatus>,
}

/// 删除签到请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DeleteCheckinRequest {
    pub member_id: i64,
    pub date: String,
}

/// 按日期查询签到的参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CheckinListQuery {
    /// 缺省为今天 (UTC)
    pub date: Option<String>,
}

/// 单条签到记录响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckinResponse {
    pub member_id: i64,
    pub checkin_time: Option<DateTime<Utc>>,
    pub message: Option<String>,
    pub status: CheckinStatus,
}

impl From<checkin_entity::Model> for CheckinResponse {
    fn from(m: checkin_entity::Model) -> Self {
        CheckinResponse {
            member_id: m.member_id,
            checkin_time: m.checkin_time,
            message: m.message,
            status: m.status,
        }
    }
}

/// 按日期查询签到的响应: 当日会议 (可能尚未建立) + 签到列表
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckinListResponse {
    pub meeting: Option<MeetingResponse>,
    pub checkins: Vec<CheckinResponse>,
}
