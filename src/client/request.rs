//! Table paging and filter state turned into list query parameters.

/// Page size used when the table has not chosen one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
enum FilterValue {
    Text(String),
    /// Sent as `<field>_min` / `<field>_max`.
    Range { min: Option<String>, max: Option<String> },
    /// Sent as `<field>_start` / `<field>_end`.
    DateRange { start: Option<String>, end: Option<String> },
}

/// The state of a paginated table: current page, page size and filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    current: Option<usize>,
    page_size: Option<usize>,
    filters: Vec<(String, FilterValue)>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based page and page size.
    pub fn page(mut self, current: usize, page_size: usize) -> Self {
        self.current = Some(current);
        self.page_size = Some(page_size);
        self
    }

    pub fn text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters
            .push((field.into(), FilterValue::Text(value.into())));
        self
    }

    pub fn range<T: ToString>(mut self, field: impl Into<String>, min: Option<T>, max: Option<T>) -> Self {
        self.filters.push((
            field.into(),
            FilterValue::Range {
                min: min.map(|v| v.to_string()),
                max: max.map(|v| v.to_string()),
            },
        ));
        self
    }

    pub fn date_range(
        mut self,
        field: impl Into<String>,
        start: Option<impl Into<String>>,
        end: Option<impl Into<String>>,
    ) -> Self {
        self.filters.push((
            field.into(),
            FilterValue::DateRange {
                start: start.map(Into::into),
                end: end.map(Into::into),
            },
        ));
        self
    }

    /// Offset window as sent to the server.
    pub fn skip_limit(&self) -> (usize, usize) {
        let current = self.current.filter(|c| *c > 0).unwrap_or(1);
        let page_size = self.page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
        ((current - 1).saturating_mul(page_size), page_size)
    }

    /// Query parameters in a stable order: `skip`, `limit`, then filters as
    /// added. Empty scalars are dropped; a range goes out only with both bounds.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let (skip, limit) = self.skip_limit();
        let mut params = vec![
            ("skip".to_string(), skip.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];

        for (field, value) in &self.filters {
            match value {
                FilterValue::Text(text) => {
                    if let Some(text) = non_empty(Some(text.clone())) {
                        params.push((field.clone(), text));
                    }
                }
                FilterValue::Range { min, max } => {
                    if let (Some(min), Some(max)) = (non_empty(min.clone()), non_empty(max.clone())) {
                        params.push((format!("{}_min", field), min));
                        params.push((format!("{}_max", field), max));
                    }
                }
                FilterValue::DateRange { start, end } => {
                    if let (Some(start), Some(end)) = (non_empty(start.clone()), non_empty(end.clone())) {
                        params.push((format!("{}_start", field), start));
                        params.push((format!("{}_end", field), end));
                    }
                }
            }
        }
        params
    }
}
