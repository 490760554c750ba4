pub mod auth_service;
pub mod checkin_service;
pub mod lottery_service;
pub mod meeting_service;
pub mod member_service;
pub mod prize_service;
pub mod sync_service;

pub use auth_service::*;
pub use checkin_service::*;
pub use lottery_service::*;
pub use meeting_service::*;
pub use member_service::*;
pub use prize_service::*;
pub use sync_service::*;
