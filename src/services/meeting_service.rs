use crate::entities::{MeetingStatus, checkin_entity as checkins, meeting_entity as meetings};
use crate::error::{AppError, AppResult};
use crate::models::{MeetingResponse, UpdateMeetingRequest, UpsertMeetingRequest};
use crate::utils::validate_date;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct MeetingService {
    pool: DatabaseConnection,
}

impl MeetingService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 会议列表 (日期倒序)
    pub async fn list(&self) -> AppResult<Vec<MeetingResponse>> {
        let list = meetings::Entity::find()
            .order_by(meetings::Column::Date, Order::Desc)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// 以日期为准创建会议, 已存在则更新状态
    pub async fn upsert(&self, req: UpsertMeetingRequest) -> AppResult<MeetingResponse> {
        validate_date(&req.date)?;
        let status = req.status.unwrap_or(MeetingStatus::Scheduled);

        let existing = meetings::Entity::find()
            .filter(meetings::Column::Date.eq(req.date.as_str()))
            .one(&self.pool)
            .await?;

        let model = match existing {
            Some(m) => {
                let mut am = m.into_active_model();
                am.status = Set(status);
                am.update(&self.pool).await?
            }
            None => {
                meetings::ActiveModel {
                    date: Set(req.date.clone()),
                    status: Set(status),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?
            }
        };

        Ok(model.into())
    }

    /// 按 ID 更新会议日期 / 状态
    pub async fn update(&self, id: i64, req: UpdateMeetingRequest) -> AppResult<MeetingResponse> {
        validate_date(&req.date)?;

        let existing = meetings::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("会议 {id} 不存在")))?;

        let mut am = existing.into_active_model();
        am.date = Set(req.date);
        am.status = Set(req.status.unwrap_or(MeetingStatus::Scheduled));
        let updated = am.update(&self.pool).await?;

        Ok(updated.into())
    }

    /// 删除会议, 连同该日期的签到记录一起清掉
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let meeting = meetings::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("会议 {id} 不存在")))?;

        let removed = checkins::Entity::delete_many()
            .filter(checkins::Column::MeetingDate.eq(meeting.date.as_str()))
            .exec(&self.pool)
            .await?;
        if removed.rows_affected > 0 {
            log::info!(
                "Removed {} checkins for meeting {} ({})",
                removed.rows_affected,
                meeting.id,
                meeting.date
            );
        }

        meetings::Entity::delete_by_id(meeting.id).exec(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn meeting(id: i64, date: &str, status: MeetingStatus) -> meetings::Model {
        meetings::Model {
            id,
            date: date.to_string(),
            status,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_meeting() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![meeting(1, "2026-08-05", MeetingStatus::Scheduled)]])
            .append_query_results([vec![meeting(1, "2026-08-05", MeetingStatus::Completed)]])
            .into_connection();

        let service = MeetingService::new(db);
        let result = service
            .upsert(UpsertMeetingRequest {
                date: "2026-08-05".to_string(),
                status: Some(MeetingStatus::Completed),
            })
            .await
            .unwrap();
        assert_eq!(result.status, MeetingStatus::Completed);
    }

    #[tokio::test]
    async fn test_upsert_rejects_bad_date() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = MeetingService::new(db);
        let err = service
            .upsert(UpsertMeetingRequest {
                date: "2026/08/05".to_string(),
                status: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_checkins_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![meeting(1, "2026-08-05", MeetingStatus::Scheduled)]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 4,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let service = MeetingService::new(db);
        assert!(service.delete(1).await.is_ok());
    }
}
