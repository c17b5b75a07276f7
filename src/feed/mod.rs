//! Feed core: filters, reconciliation, the dual view and refresh.

mod dual;
mod engineering;
mod filter;
mod reconciler;
mod refresh;

pub use dual::{Column, DUAL_PAGE_SIZE, DualFeedCoordinator, DualLoad, SharedFilters};
pub use engineering::{
    ENGINEERING_BRANCHES, ENGINEERING_NOTICE_TYPES, EngineeringFeed, branch_label,
};
pub use filter::{
    DEFAULT_PAGE_SIZE, FilterChange, FilterController, FilterState, FilterUpdate, Period, SortBy,
};
pub use reconciler::{FeedReconciler, FeedSnapshot, FeedStatus, LoadOutcome, merge_page};
pub use refresh::{REFRESH_FAILED_MESSAGE, RefreshOrchestrator, Reloadable, Toast, ToastKind};
