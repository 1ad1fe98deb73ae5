//! Cached date values for the synthetic response header.
//!
//! Formatting an IMF-fixdate on every new connection is wasted work on a
//! busy listener; the value only changes once per second. The current value
//! sits behind an `ArcSwap` and is refreshed inline when the wall clock
//! moves, so the codec stays free of any async runtime.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arc_swap::ArcSwap;
use bytes::Bytes;
use once_cell::sync::Lazy;

struct CachedDate {
    unix_second: u64,
    value: Bytes,
}

impl CachedDate {
    fn at(unix_second: u64) -> Self {
        let mut buf = faf_http_date::get_date_buff_no_key();
        faf_http_date::get_date_no_key(&mut buf);
        CachedDate { unix_second, value: Bytes::from_owner(buf) }
    }
}

static CURRENT: Lazy<ArcSwap<CachedDate>> = Lazy::new(|| ArcSwap::from_pointee(CachedDate::at(unix_second())));

fn unix_second() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|elapsed| elapsed.as_secs()).unwrap_or_default()
}

/// Returns the current date header value, reformatting at most once per
/// wall-clock second.
pub(crate) fn http_date() -> Bytes {
    let now = unix_second();
    let cached = CURRENT.load();
    if cached.unix_second == now {
        return cached.value.clone();
    }

    let fresh = Arc::new(CachedDate::at(now));
    let value = fresh.value.clone();
    CURRENT.store(fresh);
    value
}

#[cfg(test)]
mod tests {
    use super::http_date;

    #[test]
    fn looks_like_an_imf_fixdate() {
        let date = http_date();
        assert!(date.ends_with(b"GMT"));
        assert!(date.len() > 20);
        assert!(date.is_ascii());
    }

    #[test]
    fn repeated_reads_stay_consistent() {
        let first = http_date();
        let second = http_date();
        assert_eq!(first.len(), second.len());
    }
}
