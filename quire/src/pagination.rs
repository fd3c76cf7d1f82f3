use serde::Serialize;

/// Posts shown on every listing page.
pub const POSTS_SHOWN: u64 = 10;

/// A 1-based page number as requested by the caller, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest(u64);

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

impl PageRequest {
    pub fn first() -> Self {
        Self(1)
    }

    /// Page zero is treated as the first page.
    pub fn number(number: u64) -> Self {
        Self(number.max(1))
    }

    /// Parses a raw `?page=` value. Missing or non-numeric input selects the first page and
    /// negative numbers clamp to it.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim).and_then(|value| value.parse::<i64>().ok()) {
            Some(number) if number > 0 => Self(number as u64),
            _ => Self::first(),
        }
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for PageRequest {
    fn from(value: u64) -> Self {
        Self::number(value)
    }
}

/// Resolved slice of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_SHOWN)
    }
}

impl Paginator {
    pub const fn new(per_page: u64) -> Self {
        Self {
            per_page: if per_page == 0 { 1 } else { per_page },
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Never less than one: an empty listing still has a (blank) first page.
    pub fn num_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.per_page).max(1)
    }

    /// Clamps `request` into the valid range for `count` items.
    pub fn resolve(&self, count: u64, request: PageRequest) -> PageWindow {
        let num_pages = self.num_pages(count);
        let number = request.get().clamp(1, num_pages);
        let offset = (number - 1) * self.per_page;
        let limit = count.saturating_sub(offset).min(self.per_page);
        PageWindow {
            number,
            num_pages,
            offset,
            limit,
        }
    }
}

/// An ordered slice of a listing plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    /// Total item count across every page.
    pub count: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, count: u64, per_page: u64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            count,
            per_page,
        }
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    #[inline]
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
