use crate::entities::{
    CheckinStatus, MeetingStatus, checkin_entity as checkins, meeting_entity as meetings,
    member_entity as members,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    CheckinListResponse, CheckinRequest, CheckinResponse, DeleteCheckinRequest, DeleteResult,
};
use crate::utils::{validate_date, validate_member_id, validate_optional_text};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct CheckinService {
    pool: DatabaseConnection,
}

impl CheckinService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 签到
    ///
    /// 逻辑:
    /// 1. 校验输入 (编号 / 日期 / 留言长度)
    /// 2. 会员必须存在
    /// 3. 当日会议不存在则自动建立 (scheduled)
    /// 4. 已签到则更新时间 / 留言 / 状态, 未签到则新建记录
    pub async fn check_in(&self, req: CheckinRequest) -> AppResult<()> {
        validate_member_id(req.member_id)?;
        validate_date(&req.date)?;
        let message = validate_optional_text(req.message, "留言", 500)?;
        let status = req.status.unwrap_or(CheckinStatus::Present);

        if members::Entity::find_by_id(req.member_id)
            .one(&self.pool)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!("会员 {} 不存在", req.member_id)));
        }

        let existing_meeting = meetings::Entity::find()
            .filter(meetings::Column::Date.eq(req.date.as_str()))
            .one(&self.pool)
            .await?;
        if existing_meeting.is_none() {
            meetings::ActiveModel {
                date: Set(req.date.clone()),
                status: Set(MeetingStatus::Scheduled),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?;
        }

        let existing_checkin = checkins::Entity::find()
            .filter(checkins::Column::MemberId.eq(req.member_id))
            .filter(checkins::Column::MeetingDate.eq(req.date.as_str()))
            .one(&self.pool)
            .await?;

        match existing_checkin {
            Some(c) => {
                let mut am = c.into_active_model();
                am.checkin_time = Set(Some(Utc::now()));
                am.message = Set(message);
                am.status = Set(status);
                am.update(&self.pool).await?;
                log::info!("Checkin updated: member={}, date={}", req.member_id, req.date);
            }
            None => {
                checkins::ActiveModel {
                    member_id: Set(req.member_id),
                    meeting_date: Set(req.date.clone()),
                    checkin_time: Set(Some(Utc::now())),
                    message: Set(message),
                    status: Set(status),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;
                log::info!("Checkin created: member={}, date={}", req.member_id, req.date);
            }
        }

        Ok(())
    }

    /// 当日会议与签到列表 (按签到时间倒序)
    pub async fn list_by_date(&self, date: &str) -> AppResult<CheckinListResponse> {
        validate_date(date)?;

        let meeting = meetings::Entity::find()
            .filter(meetings::Column::Date.eq(date))
            .one(&self.pool)
            .await?;

        let list = checkins::Entity::find()
            .filter(checkins::Column::MeetingDate.eq(date))
            .order_by(checkins::Column::CheckinTime, Order::Desc)
            .all(&self.pool)
            .await?;

        Ok(CheckinListResponse {
            meeting: meeting.map(Into::into),
            checkins: list.into_iter().map(CheckinResponse::from).collect(),
        })
    }

    /// 删除一条签到记录
    pub async fn delete(&self, req: DeleteCheckinRequest) -> AppResult<DeleteResult> {
        validate_member_id(req.member_id)?;
        validate_date(&req.date)?;

        let result = checkins::Entity::delete_many()
            .filter(checkins::Column::MemberId.eq(req.member_id))
            .filter(checkins::Column::MeetingDate.eq(req.date.as_str()))
            .exec(&self.pool)
            .await?;

        Ok(DeleteResult {
            deleted: result.rows_affected > 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn member(id: i64) -> members::Model {
        members::Model {
            id,
            name: format!("会员{id}"),
            profession: None,
            created_at: None,
        }
    }

    fn meeting(date: &str) -> meetings::Model {
        meetings::Model {
            id: 1,
            date: date.to_string(),
            status: MeetingStatus::Scheduled,
            created_at: None,
        }
    }

    fn checkin(member_id: i64, date: &str) -> checkins::Model {
        checkins::Model {
            id: 7,
            member_id,
            meeting_date: date.to_string(),
            checkin_time: Some(Utc::now()),
            message: None,
            status: CheckinStatus::Present,
        }
    }

    #[tokio::test]
    async fn test_check_in_unknown_member_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<members::Model>::new()])
            .into_connection();

        let service = CheckinService::new(db);
        let err = service
            .check_in(CheckinRequest {
                member_id: 42,
                date: "2026-08-05".to_string(),
                message: None,
                status: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_check_in_twice_updates_existing_record() {
        // 会员存在, 会议存在, 已有签到 -> 走更新而不是插入
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![member(1)]])
            .append_query_results([vec![meeting("2026-08-05")]])
            .append_query_results([vec![checkin(1, "2026-08-05")]])
            .append_query_results([vec![checkin(1, "2026-08-05")]])
            .into_connection();

        let service = CheckinService::new(db);
        let result = service
            .check_in(CheckinRequest {
                member_id: 1,
                date: "2026-08-05".to_string(),
                message: Some("准时到".to_string()),
                status: Some(CheckinStatus::Early),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_row_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let service = CheckinService::new(db);
        let result = service
            .delete(DeleteCheckinRequest {
                member_id: 1,
                date: "2026-08-05".to_string(),
            })
            .await
            .unwrap();
        assert!(!result.deleted);
    }
}
