pub mod checkins;
pub mod lottery_winners;
pub mod meetings;
pub mod members;
pub mod prizes;

pub use checkins as checkin_entity;
pub use lottery_winners as lottery_winner_entity;
pub use meetings as meeting_entity;
pub use members as member_entity;
pub use prizes as prize_entity;

pub use checkins::CheckinStatus;
pub use meetings::MeetingStatus;
