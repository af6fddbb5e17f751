//! Business logic services.

#![allow(missing_docs)]

pub mod catalog;
pub mod claim;
pub mod dispatch;
pub mod email;
pub mod finalize;
pub mod found_item;
pub mod lost_item;
pub mod matching;
pub mod notification;
pub mod privacy;
pub mod security_question;
pub mod stats;
pub mod user;

pub use catalog::CatalogService;
pub use claim::{ClaimService, ClaimSubmission, GradeSummary, SubmitClaimInput, grade_answers};
pub use dispatch::{NotificationDispatcher, NotificationIntent};
pub use email::{
    EmailConfig, EmailDeliveryResult, EmailMessage, EmailProvider, EmailService, MailgunConfig,
    SendGridConfig, SmtpConfig,
};
pub use finalize::{FinalizeInput, FinalizeReceipt, FinalizeService};
pub use found_item::{
    FoundItemFilters, FoundItemService, HOLDING_LOCATION, ReportFoundItemInput,
};
pub use lost_item::{LostItemService, ReportLostItemInput};
pub use matching::{
    BatchMatchPair, FoundItemMatch, LostItemMatch, MatchOutcome, MatchingService, score,
};
pub use notification::NotificationService;
pub use privacy::{GatedFoundItem, PrivacyService, Visibility, visibility_for};
pub use security_question::{
    ClaimantQuestion, QuestionInput, SecurityQuestionService, SetQuestionsInput,
};
pub use stats::{StatsOverview, StatsService};
pub use user::{Identity, UserService};
