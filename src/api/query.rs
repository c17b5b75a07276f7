//! Request parameters for the notice listing endpoint.

use crate::feed::{FilterState, Period, SortBy};

/// Parameters of one `GET /notices` call.
///
/// String filters that are absent or blank are dropped so the backend's
/// "no filter" default applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoticeQuery {
    pub category: Option<String>,
    pub state: Option<String>,
    pub notice_type: Option<String>,
    pub branch: Option<String>,
    pub period: Period,
    pub sort_by: SortBy,
    pub page: u32,
    pub size: u32,
}

impl NoticeQuery {
    /// Build the query for `page` of the feed described by `filters`.
    pub fn from_filters(filters: &FilterState, page: u32) -> Self {
        Self {
            category: non_blank(filters.category.as_deref()),
            state: non_blank(filters.state.as_deref()),
            notice_type: non_blank(filters.notice_type.as_deref()),
            branch: non_blank(filters.branch.as_deref()),
            period: filters.period,
            sort_by: filters.sort_by,
            page,
            size: filters.size,
        }
    }

    /// Query-string pairs in a stable order.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(8);
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(state) = &self.state {
            params.push(("state", state.clone()));
        }
        if let Some(notice_type) = &self.notice_type {
            params.push(("noticeType", notice_type.clone()));
        }
        if let Some(branch) = &self.branch {
            params.push(("branch", branch.clone()));
        }
        params.push(("period", self.period.as_str().to_string()));
        params.push(("sortBy", self.sort_by.as_str().to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("size", self.size.to_string()));
        params
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
