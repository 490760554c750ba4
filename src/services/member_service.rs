use crate::entities::{
    checkin_entity as checkins, lottery_winner_entity as winners, member_entity as members,
};
use crate::error::{AppError, AppResult};
use crate::models::{CreateMemberRequest, DeleteResult, MemberResponse, UpdateMemberRequest};
use crate::utils::{validate_member_id, validate_name, validate_optional_text};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, SqlErr,
};

#[derive(Clone)]
pub struct MemberService {
    pool: DatabaseConnection,
}

impl MemberService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 会员列表 (按编号升序)
    pub async fn list(&self) -> AppResult<Vec<MemberResponse>> {
        let list = members::Entity::find()
            .order_by_asc(members::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 新增会员 (编号由管理员指定)
    pub async fn create(&self, req: CreateMemberRequest) -> AppResult<MemberResponse> {
        validate_member_id(req.id)?;
        let name = validate_name(&req.name, "会员姓名", 100)?;
        let profession = validate_optional_text(req.profession, "专业别", 200)?;

        // 先查重给出友好错误; 真正的防线是主键约束
        if members::Entity::find_by_id(req.id)
            .one(&self.pool)
            .await?
            .is_some()
        {
            return Err(AppError::ValidationError(
                "会员编号已存在, 请使用其他编号".to_string(),
            ));
        }

        let inserted = members::ActiveModel {
            id: Set(req.id),
            name: Set(name),
            profession: Set(profession),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::ValidationError("会员编号已存在, 请使用其他编号".to_string())
            }
            _ => AppError::DatabaseError(e),
        })?;

        log::info!("Member created: id={}, name={}", inserted.id, inserted.name);
        Ok(inserted.into())
    }

    /// 更新会员姓名 / 专业别
    pub async fn update(&self, id: i64, req: UpdateMemberRequest) -> AppResult<MemberResponse> {
        let name = validate_name(&req.name, "会员姓名", 100)?;
        let profession = validate_optional_text(req.profession, "专业别", 200)?;

        let existing = members::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("会员 {id} 不存在")))?;

        let mut am = existing.into_active_model();
        am.name = Set(name);
        am.profession = Set(profession);
        let updated = am.update(&self.pool).await?;

        Ok(updated.into())
    }

    /// 删除会员。后端没有级联约束, 先删其签到与中奖记录再删会员本体。
    pub async fn delete(&self, id: i64) -> AppResult<DeleteResult> {
        let member = members::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("会员 {id} 不存在")))?;

        let removed_checkins = checkins::Entity::delete_many()
            .filter(checkins::Column::MemberId.eq(id))
            .exec(&self.pool)
            .await?;
        let removed_winners = winners::Entity::delete_many()
            .filter(winners::Column::MemberId.eq(id))
            .exec(&self.pool)
            .await?;
        if removed_checkins.rows_affected > 0 || removed_winners.rows_affected > 0 {
            log::info!(
                "Member {} related records removed before delete: {} checkins, {} winners",
                id,
                removed_checkins.rows_affected,
                removed_winners.rows_affected
            );
        }

        let result = members::Entity::delete_by_id(member.id).exec(&self.pool).await?;
        Ok(DeleteResult {
            deleted: result.rows_affected > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn member(id: i64, name: &str) -> members::Model {
        members::Model {
            id,
            name: name.to_string(),
            profession: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![member(5, "王小明")]])
            .into_connection();

        let service = MemberService::new(db);
        let err = service
            .create(CreateMemberRequest {
                id: 5,
                name: "李大同".to_string(),
                profession: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input_before_reads() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = MemberService::new(db);

        let err = service
            .create(CreateMemberRequest {
                id: 0,
                name: "王小明".to_string(),
                profession: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_delete_cascades_related_records() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![member(5, "王小明")]])
            .append_exec_results([
                // 签到、 中奖记录、 会员本体
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 3,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let service = MemberService::new(db);
        let result = service.delete(5).await.unwrap();
        assert!(result.deleted);
    }

    #[tokio::test]
    async fn test_delete_missing_member_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<members::Model>::new()])
            .into_connection();

        let service = MemberService::new(db);
        let err = service.delete(99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
