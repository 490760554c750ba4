use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 出席状态
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum CheckinStatus {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "early")]
    Early,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "early_leave")]
    EarlyLeave,
    #[sea_orm(string_value = "absent")]
    Absent,
}

impl std::fmt::Display for CheckinStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckinStatus::Present => write!(f, "present"),
            CheckinStatus::Early => write!(f, "early"),
            CheckinStatus::Late => write!(f, "late"),
            CheckinStatus::EarlyLeave => write!(f, "early_leave"),
            CheckinStatus::Absent => write!(f, "absent"),
        }
    }
}

/// 签到记录实体
/// (member_id, meeting_date) 唯一, 重复签到按更新处理
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "checkins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub member_id: i64,
    /// 会议日期 (YYYY-MM-DD)
    pub meeting_date: String,
    pub checkin_time: Option<DateTime<Utc>>,
    /// 签到留言
    pub message: Option<String>,
    pub status: CheckinStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
