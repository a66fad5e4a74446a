//! Fixed-size paging for word lists.
//!
//! # Invariants
//! - Page numbers are 1-based; out-of-range requests clamp to the nearest
//!   valid page.
//! - An empty list has one (empty) page.

/// Entries shown per list page.
pub const PAGE_SIZE: usize = 10;

/// One page sliced out of a larger list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Effective 1-based page number.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based index of the first item shown (0 when empty).
    pub start: usize,
    /// 1-based index of the last item shown (0 when empty).
    pub end: usize,
}

impl<T: Clone> Page<T> {
    /// Slices page `page` (1-based) out of `items` with [`PAGE_SIZE`].
    pub fn of(items: &[T], page: usize) -> Self {
        let total_items = items.len();
        let total_pages = total_items.div_ceil(PAGE_SIZE).max(1);
        let page = page.clamp(1, total_pages);
        let offset = (page - 1) * PAGE_SIZE;
        let slice = items
            .iter()
            .skip(offset)
            .take(PAGE_SIZE)
            .cloned()
            .collect::<Vec<_>>();

        let (start, end) = if slice.is_empty() {
            (0, 0)
        } else {
            (offset + 1, offset + slice.len())
        };

        Self {
            items: slice,
            page,
            total_pages,
            total_items,
            start,
            end,
        }
    }
}

/// Element of a page-number strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Number(usize),
    Ellipsis,
}

/// Builds the page-number strip around `current`.
///
/// Up to four pages are listed in full; longer lists keep the first and last
/// page and collapse the rest around `current`.
pub fn page_window(current: usize, total: usize) -> Vec<PageMarker> {
    use PageMarker::{Ellipsis, Number};

    if total <= 4 {
        return (1..=total).map(Number).collect();
    }

    if current <= 3 {
        vec![
            Number(1),
            Number(2),
            Number(3),
            Number(4),
            Ellipsis,
            Number(total),
        ]
    } else if current >= total - 2 {
        vec![
            Number(1),
            Ellipsis,
            Number(total - 3),
            Number(total - 2),
            Number(total - 1),
            Number(total),
        ]
    } else {
        vec![
            Number(1),
            Ellipsis,
            Number(current - 1),
            Number(current),
            Number(current + 1),
            Ellipsis,
            Number(total),
        ]
    }
}
