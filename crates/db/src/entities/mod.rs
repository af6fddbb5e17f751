//! Database entities.

#![allow(missing_docs)]

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

pub use category::Entity as Category;
pub use claim_attempt::Entity as ClaimAttempt;
pub use found_item::Entity as FoundItem;
pub use location::Entity as Location;
pub use lost_item::Entity as LostItem;
pub use match_score::Entity as MatchScore;
pub use notification::Entity as Notification;
pub use notification_log::Entity as NotificationLog;
pub use security_question::Entity as SecurityQuestion;
pub use successful_return::Entity as SuccessfulReturn;
pub use user::Entity as User;
