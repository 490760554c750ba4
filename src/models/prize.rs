use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::prize_entity;

/// 新增奖品请求
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePrizeRequest {
    /// 奖品名称 (1-100 字符)
    pub name: String,
    /// 总数量 (非负), 剩余数量以此初始化
    pub total_quantity: i64,
    /// 抽中权重 (0-100)
    pub probability: f64,
    pub image_url: Option<String>,
}

/// 更新奖品请求
/// 注意: 修改总数量时剩余数量按 max(0, 新总量 - 已抽走) 重算
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePrizeRequest {
    pub name: String,
    pub total_quantity: i64,
    pub probability: f64,
    pub image_url: Option<String>,
}

/// 奖品响应
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PrizeResponse {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub total_quantity: i64,
    pub remaining_quantity: i64,
    pub probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<prize_entity::Model> for PrizeResponse {
    fn from(m: prize_entity::Model) -> Self {
        PrizeResponse {
            id: m.id,
            name: m.name,
            image_url: m.image_url,
            total_quantity: m.total_quantity,
            remaining_quantity: m.remaining_quantity,
            probability: m.probability,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
