use sea_orm::Order;

use crate::error::AppError;

/// Fixed page size for every paginated list.
pub const PAGE_SIZE: u64 = 20;

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Normalize a `search` query parameter into a lowercase LIKE pattern.
/// Returns `None` for absent or blank searches.
pub fn like_pattern(search: Option<&str>) -> Option<String> {
    let term = escape_like(search?.trim());
    if term.is_empty() {
        None
    } else {
        Some(format!("%{}%", term.to_lowercase()))
    }
}

/// Parse an `ordering` query parameter of the form `field` or `-field`.
pub fn parse_ordering<C: Copy>(
    raw: Option<&str>,
    fields: &[(&str, C)],
    default: C,
) -> Result<(C, Order), AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok((default, Order::Asc));
    };

    let (name, order) = match raw.strip_prefix('-') {
        Some(name) => (name, Order::Desc),
        None => (raw, Order::Asc),
    };

    fields
        .iter()
        .find(|(field, _)| *field == name)
        .map(|&(_, column)| (column, order))
        .ok_or_else(|| {
            let allowed: Vec<&str> = fields.iter().map(|(field, _)| *field).collect();
            AppError::Validation(format!(
                "ordering must be one of: {} (prefix with '-' for descending)",
                allowed.join(", ")
            ))
        })
}

/// Resolved page window for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub total_pages: u64,
}

impl PageWindow {
    /// Validate the requested page against the total number of items.
    /// Page 1 is always valid, even for an empty list.
    pub fn new(requested: Option<u64>, total: u64) -> Result<Self, AppError> {
        let page = requested.unwrap_or(1);
        let total_pages = total.div_ceil(PAGE_SIZE).max(1);
        if page == 0 || page > total_pages {
            return Err(AppError::NotFound("Invalid page".into()));
        }
        Ok(Self { page, total_pages })
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * PAGE_SIZE
    }

    /// `(next, previous)` links, keeping every query parameter except `page`.
    pub fn links(&self, path: &str, query: Option<&str>) -> (Option<String>, Option<String>) {
        let next = (self.page < self.total_pages).then(|| page_link(path, query, self.page + 1));
        let previous = (self.page > 1).then(|| page_link(path, query, self.page - 1));
        (next, previous)
    }
}

/// Build a link to `page`, dropping the `page` parameter entirely for page 1.
pub fn page_link(path: &str, query: Option<&str>, page: u64) -> String {
    let mut params: Vec<String> = query
        .unwrap_or_default()
        .split('&')
        .filter(|p| !p.is_empty() && *p != "page" && !p.starts_with("page="))
        .map(str::to_string)
        .collect();
    if page > 1 {
        params.push(format!("page={page}"));
    }

    if params.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", params.join("&"))
    }
}

/// Require an absolute http(s) URL.
pub fn validate_http_url(field: &str, value: &str) -> Result<(), AppError> {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') && !value.contains(char::is_whitespace) => {
            Ok(())
        }
        _ => Err(AppError::Validation(format!("{field} must be a valid URL"))),
    }
}

/// Require 1..=`max` Unicode characters after trimming.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    let len = value.trim().chars().count();
    if len == 0 || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be 1-{max} characters"
        )));
    }
    Ok(())
}

pub fn validate_dimension(field: &str, value: i32) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::Validation(format!("{field} must be >= 0")));
    }
    Ok(())
}
