//! Database repositories.

pub mod category;
pub mod claim_attempt;
pub mod found_item;
pub mod location;
pub mod lost_item;
pub mod match_score;
pub mod notification;
pub mod notification_log;
pub mod security_question;
pub mod successful_return;
pub mod user;

pub use category::CategoryRepository;
pub use claim_attempt::ClaimAttemptRepository;
pub use found_item::FoundItemRepository;
pub use location::LocationRepository;
pub use lost_item::LostItemRepository;
pub use match_score::MatchScoreRepository;
pub use notification::NotificationRepository;
pub use notification_log::NotificationLogRepository;
pub use security_question::SecurityQuestionRepository;
pub use successful_return::SuccessfulReturnRepository;
pub use user::UserRepository;
