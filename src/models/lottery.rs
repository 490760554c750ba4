use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 抽奖请求 (date 缺省为今天 UTC)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DrawRequest {
    pub date: Option<String>,
}

/// 抽中的奖品 (隐藏权重等配置字段)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawnPrize {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    /// 扣减后的剩余数量
    pub remaining_quantity: i64,
}

/// 中奖会员
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawnWinner {
    pub member_id: i64,
    pub name: String,
}

/// 抽奖响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawResponse {
    pub prize: DrawnPrize,
    pub winner: DrawnWinner,
    /// 当日签到总人数 (present)
    pub total_checkins: usize,
    /// 本次抽奖后的累计中奖人数
    pub total_winners: usize,
    /// 本次抽奖后仍可抽的人数
    pub remaining_eligible: usize,
    /// 中奖者抽中瞬间的概率 (1 / 抽前可抽人数), 仅用于展示
    pub winner_probability: String,
}

/// 中奖记录查询参数
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WinnerListQuery {
    /// 缺省为今天 (UTC)
    pub date: Option<String>,
}

/// 中奖记录 (关联会员与奖品名称, 供名单展示)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WinnerResponse {
    pub id: i64,
    pub meeting_date: String,
    pub created_at: Option<DateTime<Utc>>,
    pub member_id: i64,
    pub member_name: String,
    pub prize_id: i64,
    pub prize_name: String,
    pub prize_image_url: Option<String>,
}
