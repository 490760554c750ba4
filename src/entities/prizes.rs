use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 奖品配置实体
/// 概念说明:
/// - probability: 抽中权重 (0-100), 按权重占比抽取; 全为 0 时退化为均匀抽取
/// - remaining_quantity: 剩余库存, 仅允许抽奖路径条件扣减 (remaining > 0 时减一)
/// - 不变量: 0 <= remaining_quantity <= total_quantity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "prizes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 奖品名称
    pub name: String,
    /// 奖品图片 URL (不存储图片本体)
    pub image_url: Option<String>,
    /// 总数量
    pub total_quantity: i64,
    /// 剩余数量
    pub remaining_quantity: i64,
    /// 抽中权重 (0-100)
    pub probability: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// 是否还有库存
    pub fn in_stock(&self) -> bool {
        self.remaining_quantity > 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
