pub mod auth;
pub mod checkin;
pub mod common;
pub mod lottery;
pub mod meeting;
pub mod member;
pub mod prize;

pub use auth::*;
pub use checkin::*;
pub use common::*;
pub use lottery::*;
pub use meeting::*;
pub use member::*;
pub use prize::*;
