//! Filter & pagination engine shared by every repository.
//!
//! Predicates are ANDed; an absent predicate matches everything. Pagination is
//! zero-based and `page_size == 0` means "no pagination".

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::Range;
use std::str::FromStr;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// No pagination: the whole match set.
    pub fn unpaged() -> Self {
        Self::default()
    }

    pub fn is_requested(&self) -> bool {
        self.page_size > 0
    }

    /// Number of matches skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.page_size)
    }

    /// Index window of this page over `len` matches, empty past the end.
    pub fn window(&self, len: usize) -> Range<usize> {
        if !self.is_requested() {
            return 0..len;
        }
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        if start >= len {
            return len..len;
        }
        let end = start.saturating_add(self.page_size as usize).min(len);
        start..end
    }

    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        let window = self.window(items.len());
        if window.len() == items.len() {
            return items;
        }
        items
            .into_iter()
            .skip(window.start)
            .take(window.len())
            .collect()
    }

    /// Lenient parsing of raw query values.
    ///
    /// Unparsable or negative pages become 0; sizes outside `1..=100` or
    /// unparsable sizes leave pagination unset.
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = parse_number::<i64>(page)
            .filter(|p| *p >= 0)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(0);
        let page_size = parse_number::<i64>(page_size)
            .filter(|s| (1..=i64::from(MAX_PAGE_SIZE)).contains(s))
            .map(|s| s as u32)
            .unwrap_or(0);
        Self { page, page_size }
    }
}

/// Predicate set over one entity type.
pub trait EntityFilter<E>: Clone + Debug + Default + Send + Sync + 'static {
    /// True iff every present predicate holds for `entity`.
    fn matches(&self, entity: &E) -> bool;

    fn pagination(&self) -> Pagination;

    fn set_pagination(&mut self, pagination: Pagination);

    /// Restrict the filter to active entities.
    fn only_active(self) -> Self;

    /// Same predicates, no pagination.
    fn without_pagination(&self) -> Self {
        let mut unpaged = self.clone();
        unpaged.set_pagination(Pagination::unpaged());
        unpaged
    }
}

/// Matching entities in input order, then paginated.
pub fn apply<'a, E, F, I>(filter: &F, entities: I) -> Vec<E>
where
    E: Clone + 'a,
    F: EntityFilter<E>,
    I: IntoIterator<Item = &'a E>,
{
    let matched: Vec<E> = entities
        .into_iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect();
    filter.pagination().paginate(matched)
}

/// Number of matches, ignoring pagination.
pub fn count<'a, E, F, I>(filter: &F, entities: I) -> u64
where
    E: 'a,
    F: EntityFilter<E>,
    I: IntoIterator<Item = &'a E>,
{
    entities.into_iter().filter(|e| filter.matches(e)).count() as u64
}

/// Equality predicate; `None` matches anything.
pub fn eq_or_any<T: PartialEq + ?Sized>(expected: Option<&T>, actual: &T) -> bool {
    expected.is_none_or(|e| e == actual)
}

/// Inclusive range predicate; missing bounds are open.
pub fn in_range<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.is_none_or(|min| value >= min) && max.is_none_or(|max| value <= max)
}

/// Case-insensitive substring predicate; a missing haystack never matches a
/// present needle.
pub fn contains_ignore_case(needle: Option<&str>, haystack: Option<&str>) -> bool {
    match (needle, haystack) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(needle), Some(haystack)) => haystack
            .to_lowercase()
            .contains(&needle.to_lowercase()),
    }
}

/// Parse an optional raw query value, treating garbage as absent.
pub fn parse_number<T: FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Parse a boolean flag, treating garbage as absent.
pub fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => Some(true),
        Some("false") | Some("0") => Some(false),
        _ => None,
    }
}

/// Trimmed, non-empty string predicate value.
pub fn parse_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
