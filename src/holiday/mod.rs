//! Holiday annotations
//!
//! Day-keyed holiday and make-up workday entries come from a built-in per-year
//! dataset and from a cache filled by [`sync_holidays`]. The calendar view
//! reads them through [`holiday_map`], where cached entries override built-in
//! ones for the same day.

pub mod cache;
pub mod entry;
pub mod merge;
pub mod sources;
pub mod sync;

pub use cache::HolidayCache;
pub use entry::{
    DEFAULT_HOLIDAY_NAME, HolidayEntry, HolidayKind, SOURCE_BUILTIN, SOURCE_REMOTE_CACHE,
    normalize_entries, normalize_entry,
};
pub use merge::{
    HolidayApiPayload, HolidayApiRow, HolidayMap, into_map, merge_entries, merge_holiday_maps,
    parse_holiday_api_rows, visible_years,
};
pub use sources::{PayloadFileProvider, builtin_file_name, load_builtin_holidays};
pub use sync::{SyncReport, payload_chain, sync_holidays};

use crate::config::HolidayConfig;
use crate::storage::Storage;
use std::time::Duration;

/// Built-in entries for `year` merged with the cached ones, keyed by day
pub async fn holiday_map(storage: &Storage, config: &HolidayConfig, year: i32) -> HolidayMap {
    let builtin = match config.builtin_dir {
        Some(ref dir) => {
            load_builtin_holidays(dir, year, Duration::from_millis(config.builtin_timeout_ms)).await
        }
        None => Vec::new(),
    };
    let cache = HolidayCache::load(storage);
    into_map([builtin.as_slice(), cache.year(year)])
}
