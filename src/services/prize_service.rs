use crate::entities::prize_entity as prizes;
use crate::error::{AppError, AppResult};
use crate::models::{CreatePrizeRequest, PrizeResponse, UpdatePrizeRequest};
use crate::utils::{validate_name, validate_optional_text};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order, QueryOrder, Set,
};

#[derive(Clone)]
pub struct PrizeService {
    pool: DatabaseConnection,
}

impl PrizeService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 奖品列表 (新的在前)
    pub async fn list(&self) -> AppResult<Vec<PrizeResponse>> {
        let list = prizes::Entity::find()
            .order_by(prizes::Column::Id, Order::Desc)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 新增奖品, 剩余数量以总数量初始化
    pub async fn create(&self, req: CreatePrizeRequest) -> AppResult<PrizeResponse> {
        let name = validate_name(&req.name, "奖品名称", 100)?;
        let image_url = validate_optional_text(req.image_url, "图片 URL", 500)?;
        validate_quantity(req.total_quantity)?;
        validate_probability(req.probability)?;

        let inserted = prizes::ActiveModel {
            name: Set(name),
            image_url: Set(image_url),
            total_quantity: Set(req.total_quantity),
            remaining_quantity: Set(req.total_quantity),
            probability: Set(req.probability),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Prize created: id={}, name={}", inserted.id, inserted.name);
        Ok(inserted.into())
    }

    /// 更新奖品配置。总数量变化时剩余数量按已抽走数重算,
    /// 不触碰 0 <= remaining <= total 不变量。
    pub async fn update(&self, id: i64, req: UpdatePrizeRequest) -> AppResult<PrizeResponse> {
        let name = validate_name(&req.name, "奖品名称", 100)?;
        let image_url = validate_optional_text(req.image_url, "图片 URL", 500)?;
        validate_quantity(req.total_quantity)?;
        validate_probability(req.probability)?;

        let existing = prizes::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("奖品 {id} 不存在")))?;

        let remaining = recompute_remaining(
            existing.total_quantity,
            existing.remaining_quantity,
            req.total_quantity,
        );

        let mut am = existing.into_active_model();
        am.name = Set(name);
        am.image_url = Set(image_url);
        am.total_quantity = Set(req.total_quantity);
        am.remaining_quantity = Set(remaining);
        am.probability = Set(req.probability);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;

        Ok(updated.into())
    }

    /// 删除奖品
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let existing = prizes::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("奖品 {id} 不存在")))?;

        prizes::Entity::delete_by_id(existing.id).exec(&self.pool).await?;
        Ok(())
    }
}

fn validate_quantity(quantity: i64) -> AppResult<()> {
    if quantity < 0 {
        return Err(AppError::ValidationError("总数量必须是非负整数".to_string()));
    }
    Ok(())
}

fn validate_probability(probability: f64) -> AppResult<()> {
    if !probability.is_finite() || probability < 0.0 || probability > 100.0 {
        return Err(AppError::ValidationError(
            "中奖权重必须是 0-100 之间的数字".to_string(),
        ));
    }
    Ok(())
}

/// 总数量修改后的剩余数量: 保留已抽走的份数, 下限 0
fn recompute_remaining(old_total: i64, old_remaining: i64, new_total: i64) -> i64 {
    let used = old_total - old_remaining;
    (new_total - used).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recompute_remaining_preserves_consumption() {
        // 已抽走 3 份, 总量 10 -> 15, 剩余 7 -> 12
        assert_eq!(recompute_remaining(10, 7, 15), 12);
        // 总量缩到已抽走数以下时剩余归零
        assert_eq!(recompute_remaining(10, 7, 2), 0);
        // 总量不变剩余不变
        assert_eq!(recompute_remaining(10, 7, 10), 7);
        assert_eq!(recompute_remaining(0, 0, 5), 5);
    }

    #[test]
    fn test_validate_probability_bounds() {
        assert!(validate_probability(0.0).is_ok());
        assert!(validate_probability(45.5).is_ok());
        assert!(validate_probability(100.0).is_ok());
        assert!(validate_probability(-1.0).is_err());
        assert!(validate_probability(100.5).is_err());
        assert!(validate_probability(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(10).is_ok());
        assert!(validate_quantity(-1).is_err());
    }
}
