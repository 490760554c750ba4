use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 中奖记录实体
/// 说明:
/// - 每次抽奖成功产生一条记录, 抽奖路径只追加、不更新不删除
/// - (member_id, meeting_date) 唯一索引是"每人每日最多中奖一次"的最终裁决,
///   应用层的资格过滤在并发下不可靠
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "lottery_winners")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 会议日期 (YYYY-MM-DD)
    pub meeting_date: String,
    pub member_id: i64,
    /// 奖品ID (指向 prizes.id)
    pub prize_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
