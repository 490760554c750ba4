use std::collections::{HashMap, HashSet};

use crate::entities::{
    CheckinStatus, checkin_entity as checkins, lottery_winner_entity as winners,
    member_entity as members, prize_entity as prizes,
};
use crate::error::{AppError, AppResult};
use crate::models::{DrawResponse, DrawnPrize, DrawnWinner, WinnerResponse};
use crate::utils::validate_date;
use rand::Rng;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, Set, UpdateResult,
};

/// 单次抽奖中库存冲突的重试上限 (覆盖当前有库存的奖品集合, 防止持续争用下活锁)
const DRAW_MAX_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct LotteryService {
    pool: DatabaseConnection,
}

impl LotteryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 抽奖 (Draw)
    ///
    /// 逻辑:
    /// 1. 校验日期
    /// 2. 读取当日 present 签到与已中奖名单, 求差得到可抽名单
    /// 3. 等概率抽一名会员; 按权重抽一个有库存的奖品
    /// 4. 条件扣减库存 (update where remaining_quantity > 0);
    ///    冲突则剔除该奖品换一个重抽, 最多 3 次
    /// 5. 写中奖记录; 此时失败库存已无法回滚, 以 PartialFailure 显式上报
    /// 6. 返回奖品、会员与当日统计
    pub async fn draw(&self, date: &str) -> AppResult<DrawResponse> {
        self.draw_with_rng(date, &mut rand::thread_rng()).await
    }

    /// 与 draw 相同, 但随机源由调用方注入 (测试用固定种子)
    pub async fn draw_with_rng<R: Rng>(&self, date: &str, rng: &mut R) -> AppResult<DrawResponse> {
        validate_date(date)?;

        // 当日 present 签到 (按会员编号升序, 抽取顺序可复现)
        let present: Vec<i64> = checkins::Entity::find()
            .filter(checkins::Column::MeetingDate.eq(date))
            .filter(checkins::Column::Status.eq(CheckinStatus::Present))
            .order_by_asc(checkins::Column::MemberId)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|c| c.member_id)
            .collect();

        let prior_winners = winners::Entity::find()
            .filter(winners::Column::MeetingDate.eq(date))
            .all(&self.pool)
            .await?;
        let won_ids: Vec<i64> = prior_winners.iter().map(|w| w.member_id).collect();

        let eligible = eligible_member_ids(&present, &won_ids);
        if eligible.is_empty() {
            return Err(AppError::NoEligibleMembers);
        }

        // 概率在抽取移除该会员之前计算, 仅用于展示
        let winner_probability = format!("{:.2}%", 100.0 / eligible.len() as f64);
        let member_id = select_member(rng, &eligible);

        // 有库存的奖品, 按 id 升序 (加权遍历顺序固定)
        let mut in_stock: Vec<prizes::Model> = prizes::Entity::find()
            .filter(prizes::Column::RemainingQuantity.gt(0))
            .order_by_asc(prizes::Column::Id)
            .all(&self.pool)
            .await?;

        if in_stock.is_empty() {
            return Err(AppError::NoAvailablePrizes);
        }

        // 选奖品并扣库存; 扣减失败说明该奖品刚被并发抽空, 剔除后重试
        let mut attempts = 0;
        let secured = loop {
            attempts += 1;
            let chosen_id = select_prize(rng, &in_stock)?.id;

            match self.try_decrement(chosen_id).await? {
                Some(updated) => break updated,
                None => {
                    in_stock.retain(|p| p.id != chosen_id);
                    if in_stock.is_empty() || attempts >= DRAW_MAX_ATTEMPTS {
                        return Err(AppError::NoAvailablePrizes);
                    }
                }
            }
        };

        // 写中奖记录 (库存已扣减, 从这里起任何失败都是部分失败,
        // 后端没有跨表事务, 不做自动补偿, 交由运营核对)
        let insert_result = winners::ActiveModel {
            meeting_date: Set(date.to_string()),
            member_id: Set(member_id),
            prize_id: Set(secured.id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        if let Err(e) = insert_result {
            let detail = match e.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => format!(
                    "member {member_id} already has a winner record for {date}; \
                     one unit of prize {} ({}) was consumed without a record",
                    secured.id, secured.name
                ),
                _ => format!(
                    "failed to record winner for member {member_id} on {date} \
                     after decrementing prize {} ({}): {e}",
                    secured.id, secured.name
                ),
            };
            return Err(AppError::PartialFailure(detail));
        }

        let winner_member = members::Entity::find_by_id(member_id).one(&self.pool).await?;
        let winner_name = winner_member.map(|m| m.name).unwrap_or_default();

        Ok(DrawResponse {
            prize: DrawnPrize {
                id: secured.id,
                name: secured.name,
                image_url: secured.image_url,
                remaining_quantity: secured.remaining_quantity,
            },
            winner: DrawnWinner {
                member_id,
                name: winner_name,
            },
            total_checkins: present.len(),
            total_winners: prior_winners.len() + 1,
            remaining_eligible: eligible.len() - 1,
            winner_probability,
        })
    }

    /// 当日中奖名单 (新的在前), 关联会员姓名与奖品名称
    pub async fn list_winners(&self, date: &str) -> AppResult<Vec<WinnerResponse>> {
        validate_date(date)?;

        let records = winners::Entity::find()
            .filter(winners::Column::MeetingDate.eq(date))
            .order_by(winners::Column::CreatedAt, Order::Desc)
            .order_by(winners::Column::Id, Order::Desc)
            .all(&self.pool)
            .await?;

        if records.is_empty() {
            return Ok(Vec::new());
        }

        let member_ids: HashSet<i64> = records.iter().map(|r| r.member_id).collect();
        let prize_ids: HashSet<i64> = records.iter().map(|r| r.prize_id).collect();

        let member_names: HashMap<i64, String> = members::Entity::find()
            .filter(members::Column::Id.is_in(member_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        let prize_info: HashMap<i64, (String, Option<String>)> = prizes::Entity::find()
            .filter(prizes::Column::Id.is_in(prize_ids))
            .all(&self.pool)
            .await?
            .into_iter()
            .map(|p| (p.id, (p.name, p.image_url)))
            .collect();

        Ok(records
            .into_iter()
            .map(|r| {
                let (prize_name, prize_image_url) =
                    prize_info.get(&r.prize_id).cloned().unwrap_or_default();
                WinnerResponse {
                    id: r.id,
                    meeting_date: r.meeting_date,
                    created_at: r.created_at,
                    member_id: r.member_id,
                    member_name: member_names.get(&r.member_id).cloned().unwrap_or_default(),
                    prize_id: r.prize_id,
                    prize_name,
                    prize_image_url,
                }
            })
            .collect())
    }

    /// 条件扣减库存: 仅在写入时刻 remaining_quantity > 0 才减一 (存储层比较交换,
    /// 不是应用内存里的读改写)。返回 None 表示条件不满足 —— 属预期冲突, 由调用方重试,
    /// 这是并发抽奖下库存不为负的唯一保证。
    async fn try_decrement(&self, prize_id: i64) -> AppResult<Option<prizes::Model>> {
        let result: UpdateResult = prizes::Entity::update_many()
            .col_expr(
                prizes::Column::RemainingQuantity,
                Expr::col(prizes::Column::RemainingQuantity).sub(1),
            )
            .filter(prizes::Column::Id.eq(prize_id))
            .filter(prizes::Column::RemainingQuantity.gt(0))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        // 重新读取扣减后的最新数据
        let updated = prizes::Entity::find_by_id(prize_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("prize {prize_id} disappeared after decrement"))
            })?;
        Ok(Some(updated))
    }
}

/// 可抽名单 = 当日 present 签到会员 - 已中奖会员。
/// 结果只是一次一致读的快照, 并发抽奖可能随时使其失效,
/// 最终以唯一索引与条件扣减为准。
pub(crate) fn eligible_member_ids(present: &[i64], won: &[i64]) -> Vec<i64> {
    let won_set: HashSet<i64> = won.iter().copied().collect();
    present
        .iter()
        .copied()
        .filter(|id| !won_set.contains(id))
        .collect()
}

/// 从非空候选集中等概率抽取一名会员
pub(crate) fn select_member<R: Rng + ?Sized>(rng: &mut R, eligible: &[i64]) -> i64 {
    eligible[rng.gen_range(0..eligible.len())]
}

/// 按权重抽取奖品 (调用方保证传入的都是有库存的奖品, 且按 id 升序)。
///
/// 权重取 max(probability, 0); 总权重 <= 0 时每个奖品按权重 1 处理 (均匀抽取,
/// 显式退化而不是除零)。算法: 在 [0, 总权重) 取 r, 依序扣减各奖品权重,
/// 余量首次降到 <= 0 的奖品即被选中; 边界上的并列取遍历顺序靠前者。
pub(crate) fn select_prize<'a, R: Rng + ?Sized>(
    rng: &mut R,
    in_stock: &'a [prizes::Model],
) -> AppResult<&'a prizes::Model> {
    if in_stock.is_empty() {
        return Err(AppError::NoAvailablePrizes);
    }

    let mut weights: Vec<f64> = in_stock.iter().map(|p| p.probability.max(0.0)).collect();
    let mut total: f64 = weights.iter().sum();
    if total <= 0.0 {
        weights = vec![1.0; in_stock.len()];
        total = in_stock.len() as f64;
    }

    let mut remainder = rng.gen_range(0.0..total);
    let mut selected = &in_stock[0];
    for (prize, weight) in in_stock.iter().zip(&weights) {
        remainder -= weight;
        if remainder <= 0.0 {
            selected = prize;
            break;
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};

    fn prize(id: i64, remaining: i64, probability: f64) -> prizes::Model {
        prizes::Model {
            id,
            name: format!("Prize {id}"),
            image_url: None,
            total_quantity: 10,
            remaining_quantity: remaining,
            probability,
            created_at: None,
            updated_at: None,
        }
    }

    fn checkin(member_id: i64, date: &str) -> checkins::Model {
        checkins::Model {
            id: member_id,
            member_id,
            meeting_date: date.to_string(),
            checkin_time: Some(Utc::now()),
            message: None,
            status: CheckinStatus::Present,
        }
    }

    fn winner_row(id: i64, member_id: i64, prize_id: i64, date: &str) -> winners::Model {
        winners::Model {
            id,
            meeting_date: date.to_string(),
            member_id,
            prize_id,
            created_at: None,
        }
    }

    #[test]
    fn test_eligible_member_ids_subtracts_winners() {
        assert_eq!(eligible_member_ids(&[1, 2, 3], &[2]), vec![1, 3]);
        assert_eq!(eligible_member_ids(&[1, 2, 3], &[]), vec![1, 2, 3]);
        assert!(eligible_member_ids(&[], &[1]).is_empty());
        assert!(eligible_member_ids(&[1, 2], &[1, 2]).is_empty());
    }

    #[test]
    fn test_select_member_always_in_set() {
        let eligible = vec![3, 7, 11, 42];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(eligible.contains(&select_member(&mut rng, &eligible)));
        }
    }

    #[test]
    fn test_select_member_zero_rng_picks_first() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(select_member(&mut rng, &[5, 6, 7]), 5);
    }

    #[test]
    fn test_select_prize_empty_list_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            select_prize(&mut rng, &[]),
            Err(AppError::NoAvailablePrizes)
        ));
    }

    #[test]
    fn test_select_prize_never_picks_filtered_out_stock() {
        // 调用方先按库存过滤; 过滤后无库存奖品不可能被选中
        let all = vec![prize(1, 0, 50.0), prize(2, 3, 50.0), prize(3, 1, 50.0)];
        let in_stock: Vec<prizes::Model> = all.into_iter().filter(|p| p.in_stock()).collect();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let p = select_prize(&mut rng, &in_stock).unwrap();
            assert!(p.remaining_quantity > 0);
            assert_ne!(p.id, 1);
        }
    }

    #[test]
    fn test_select_prize_weight_ratio_converges() {
        // 权重 1:3, 一万次抽取后占比应接近 25%:75%
        let in_stock = vec![prize(1, 100, 1.0), prize(2, 100, 3.0)];
        let mut rng = StdRng::seed_from_u64(42);
        let mut first = 0usize;
        for _ in 0..10_000 {
            if select_prize(&mut rng, &in_stock).unwrap().id == 1 {
                first += 1;
            }
        }
        assert!(
            (2250..=2750).contains(&first),
            "expected ~2500 picks of the weight-1 prize, got {first}"
        );
    }

    #[test]
    fn test_select_prize_zero_weights_fall_back_to_uniform() {
        // 全部权重为 0 时退化为均匀抽取, 三个奖品各约 1/3
        let in_stock = vec![prize(1, 100, 0.0), prize(2, 100, 0.0), prize(3, 100, 0.0)];
        let mut rng = StdRng::seed_from_u64(24);
        let mut counts = [0usize; 3];
        for _ in 0..9_000 {
            let id = select_prize(&mut rng, &in_stock).unwrap().id;
            counts[(id - 1) as usize] += 1;
        }
        for (i, count) in counts.iter().enumerate() {
            assert!(
                (2700..=3300).contains(count),
                "prize {} picked {count} times, expected ~3000",
                i + 1
            );
        }
    }

    #[test]
    fn test_select_prize_negative_weights_clamped() {
        // 负权重按 0 处理; 唯一的正权重奖品必然被选中
        let in_stock = vec![prize(1, 5, -10.0), prize(2, 5, 4.0)];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            assert_eq!(select_prize(&mut rng, &in_stock).unwrap().id, 2);
        }
    }

    #[test]
    fn test_select_prize_boundary_tie_breaks_to_first() {
        // r == 0 时余量在第一个奖品处即降到 0, 并列取遍历顺序靠前者
        let in_stock = vec![prize(1, 5, 0.0), prize(2, 5, 5.0)];
        let mut rng = StepRng::new(0, 0);
        assert_eq!(select_prize(&mut rng, &in_stock).unwrap().id, 1);
    }

    // ---- DrawCoordinator 场景 (MockDatabase) ----

    const DATE: &str = "2026-08-05";

    fn member_row(id: i64, name: &str) -> members::Model {
        members::Model {
            id,
            name: name.to_string(),
            profession: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_draw_end_to_end_success() {
        // 可抽 {1,2,3}, 奖品 1 权重 100 必中; 扣减成功, 写记录成功
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                checkin(1, DATE),
                checkin(2, DATE),
                checkin(3, DATE),
            ]])
            .append_query_results([Vec::<winners::Model>::new()])
            .append_query_results([vec![prize(1, 1, 100.0), prize(2, 5, 0.0)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![prize(1, 0, 100.0)]])
            .append_query_results([vec![winner_row(1, 1, 1, DATE)]])
            .append_query_results([vec![member_row(1, "洪怡芳Ruby")]])
            .into_connection();

        let service = LotteryService::new(db);
        // StepRng 恒为 0: 会员取升序第一个 (id 1), 奖品落在权重 100 的 id 1
        let mut rng = StepRng::new(0, 0);
        let result = service.draw_with_rng(DATE, &mut rng).await.unwrap();

        assert_eq!(result.winner.member_id, 1);
        assert_eq!(result.winner.name, "洪怡芳Ruby");
        assert_eq!(result.prize.id, 1);
        assert_eq!(result.prize.remaining_quantity, 0);
        assert_eq!(result.total_checkins, 3);
        assert_eq!(result.total_winners, 1);
        assert_eq!(result.remaining_eligible, 2);
        assert_eq!(result.winner_probability, "33.33%");
    }

    #[tokio::test]
    async fn test_draw_no_checkins_fails_without_writes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<checkins::Model>::new()])
            .append_query_results([Vec::<winners::Model>::new()])
            .into_connection();

        let service = LotteryService::new(db);
        let err = service.draw(DATE).await.unwrap_err();
        assert!(matches!(err, AppError::NoEligibleMembers));
    }

    #[tokio::test]
    async fn test_draw_all_members_already_won() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![checkin(1, DATE), checkin(2, DATE)]])
            .append_query_results([vec![
                winner_row(10, 1, 1, DATE),
                winner_row(11, 2, 1, DATE),
            ]])
            .into_connection();

        let service = LotteryService::new(db);
        let err = service.draw(DATE).await.unwrap_err();
        assert!(matches!(err, AppError::NoEligibleMembers));
    }

    #[tokio::test]
    async fn test_draw_no_prizes_in_stock_fails_without_writes() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![checkin(1, DATE)]])
            .append_query_results([Vec::<winners::Model>::new()])
            .append_query_results([Vec::<prizes::Model>::new()])
            .into_connection();

        let service = LotteryService::new(db);
        let err = service.draw(DATE).await.unwrap_err();
        assert!(matches!(err, AppError::NoAvailablePrizes));
    }

    #[tokio::test]
    async fn test_draw_invalid_date_rejected_before_reads() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = LotteryService::new(db);
        let err = service.draw("08/05/2026").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_draw_retries_on_decrement_conflict() {
        // 奖品 1 权重 100 首选, 但库存恰被并发请求抽空 (rows_affected = 0);
        // 剔除后对剩余奖品重抽 (此时权重全 0, 均匀退化) 并成功
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![checkin(1, DATE)]])
            .append_query_results([Vec::<winners::Model>::new()])
            .append_query_results([vec![prize(1, 1, 100.0), prize(2, 5, 0.0)]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .append_query_results([vec![prize(2, 4, 0.0)]])
            .append_query_results([vec![winner_row(1, 1, 2, DATE)]])
            .append_query_results([vec![member_row(1, "洪怡芳Ruby")]])
            .into_connection();

        let service = LotteryService::new(db);
        let result = service.draw(DATE).await.unwrap();

        assert_eq!(result.prize.id, 2);
        assert_eq!(result.prize.remaining_quantity, 4);
    }

    #[tokio::test]
    async fn test_draw_retries_exhaust_to_no_available_prizes() {
        // 唯一的奖品扣减失败且无替补 -> NoAvailablePrizes, 不写中奖记录
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![checkin(1, DATE)]])
            .append_query_results([Vec::<winners::Model>::new()])
            .append_query_results([vec![prize(1, 1, 100.0)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let service = LotteryService::new(db);
        let err = service.draw(DATE).await.unwrap_err();
        assert!(matches!(err, AppError::NoAvailablePrizes));
    }

    #[tokio::test]
    async fn test_draw_winner_insert_failure_is_partial_failure() {
        // 库存已扣减后写中奖记录失败 -> 必须上报 PartialFailure 而不是普通错误
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![checkin(1, DATE)]])
            .append_query_results([Vec::<winners::Model>::new()])
            .append_query_results([vec![prize(1, 2, 100.0)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![prize(1, 1, 100.0)]])
            .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                "duplicate key value violates unique constraint \
                 \"idx_lottery_winners_member_date_unique\""
                    .to_string(),
            ))])
            .into_connection();

        let service = LotteryService::new(db);
        let err = service.draw(DATE).await.unwrap_err();
        match err {
            AppError::PartialFailure(msg) => {
                assert!(msg.contains("prize 1"), "message should name the consumed prize: {msg}");
            }
            other => panic!("expected PartialFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_winners_joins_names() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![winner_row(5, 2, 1, DATE)]])
            .append_query_results([vec![member_row(2, "何青馨Eva")]])
            .append_query_results([vec![prize(1, 0, 10.0)]])
            .into_connection();

        let service = LotteryService::new(db);
        let list = service.list_winners(DATE).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].member_name, "何青馨Eva");
        assert_eq!(list[0].prize_name, "Prize 1");
    }

    #[tokio::test]
    async fn test_list_winners_empty_date() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<winners::Model>::new()])
            .into_connection();

        let service = LotteryService::new(db);
        assert!(service.list_winners(DATE).await.unwrap().is_empty());
    }
}
