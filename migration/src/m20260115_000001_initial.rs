use sea_orm_migration::prelude::*;

/// Members (会员名册, 编号由管理员分配)
#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    Name,
    Profession,
    CreatedAt,
}

/// Meetings (每周例会, 日期唯一)
#[derive(DeriveIden)]
enum Meetings {
    Table,
    Id,
    Date,
    Status,
    CreatedAt,
}

/// Checkins (签到记录, 每人每日一条)
#[derive(DeriveIden)]
enum Checkins {
    Table,
    Id,
    MemberId,
    MeetingDate,
    CheckinTime,
    Message,
    Status,
}

/// Prizes (奖品配置与库存)
#[derive(DeriveIden)]
enum Prizes {
    Table,
    Id,
    Name,
    ImageUrl,
    TotalQuantity,
    RemainingQuantity,
    Probability,
    CreatedAt,
    UpdatedAt,
}

/// LotteryWinners (中奖记录, 每人每日最多一条)
#[derive(DeriveIden)]
enum LotteryWinners {
    Table,
    Id,
    MeetingDate,
    MemberId,
    PrizeId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 不建外键: 跨表清理由服务层显式执行 (删会员先删其签到与中奖记录),
/// 抽奖语义只依赖两个唯一索引与奖品库存的条件更新。
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 会员表 (id 非自增, 与线下名册一致)
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Members::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Members::Profession).string_len(255).null())
                    .col(
                        ColumnDef::new(Members::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 会议表
        manager
            .create_table(
                Table::create()
                    .table(Meetings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meetings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meetings::Date).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Meetings::Status)
                            .string_len(32)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(Meetings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 会议日期唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_meetings_date_unique")
                    .table(Meetings::Table)
                    .col(Meetings::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 签到表
        manager
            .create_table(
                Table::create()
                    .table(Checkins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Checkins::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Checkins::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(Checkins::MeetingDate).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Checkins::CheckinTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(ColumnDef::new(Checkins::Message).string_len(500).null())
                    .col(
                        ColumnDef::new(Checkins::Status)
                            .string_len(32)
                            .not_null()
                            .default("present"),
                    )
                    .to_owned(),
            )
            .await?;

        // 每人每日一条签到
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_checkins_member_date_unique")
                    .table(Checkins::Table)
                    .col(Checkins::MemberId)
                    .col(Checkins::MeetingDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按日期查询签到
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_checkins_date")
                    .table(Checkins::Table)
                    .col(Checkins::MeetingDate)
                    .to_owned(),
            )
            .await?;

        // 奖品表
        manager
            .create_table(
                Table::create()
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prizes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prizes::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Prizes::ImageUrl).string_len(500).null())
                    .col(
                        ColumnDef::new(Prizes::TotalQuantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Prizes::RemainingQuantity)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Prizes::Probability)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Prizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 中奖记录表
        manager
            .create_table(
                Table::create()
                    .table(LotteryWinners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LotteryWinners::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::MeetingDate)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::MemberId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::PrizeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LotteryWinners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 每人每日最多中奖一次 —— 并发下 "最多赢一次" 的最终裁决
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lottery_winners_member_date_unique")
                    .table(LotteryWinners::Table)
                    .col(LotteryWinners::MemberId)
                    .col(LotteryWinners::MeetingDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按日期查询中奖名单
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lottery_winners_date")
                    .table(LotteryWinners::Table)
                    .col(LotteryWinners::MeetingDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序: 记录类 -> 配置类 -> 名册
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(LotteryWinners::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Checkins::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Prizes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Meetings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Members::Table).to_owned())
            .await?;

        Ok(())
    }
}
