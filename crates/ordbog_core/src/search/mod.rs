//! Store search and list paging.
//!
//! # Responsibility
//! - Case-insensitive substring search over keys and values.
//! - Fixed-size paging and ellipsis-windowed page numbers for list views.

pub mod filter;
pub mod paging;
