//! Shared application state.

#![allow(missing_docs)]

use reclaim_core::{
    CatalogService, ClaimService, FinalizeService, FoundItemService, LostItemService,
    MatchingService, NotificationService, SecurityQuestionService, StatsService, UserService,
};

/// Application state.
///
/// One field per domain service; handlers borrow what they need. All
/// services are cheap to clone, so the whole state clones per request.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub lost_item_service: LostItemService,
    pub found_item_service: FoundItemService,
    pub security_question_service: SecurityQuestionService,
    pub claim_service: ClaimService,
    pub finalize_service: FinalizeService,
    pub matching_service: MatchingService,
    pub notification_service: NotificationService,
    pub catalog_service: CatalogService,
    pub stats_service: StatsService,
}
