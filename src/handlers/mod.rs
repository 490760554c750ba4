pub mod auth;
pub mod checkin;
pub mod lottery;
pub mod meeting;
pub mod member;
pub mod prize;
pub mod sync;

pub use auth::auth_config;
pub use checkin::checkin_config;
pub use member::member_config;

use actix_web::web;

/// 后台路由统一挂在 /admin 下, 由认证中间件整体保护
pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .configure(member::member_admin_config)
            .configure(checkin::checkin_admin_config)
            .configure(meeting::meeting_config)
            .configure(prize::prize_config)
            .configure(lottery::lottery_config)
            .configure(sync::sync_config),
    );
}

/// 今天的日期 (UTC, YYYY-MM-DD), 查询与抽奖的缺省日期
pub(crate) fn today_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}
