//! Clock & ID source (spec.md §2.1): RFC 7231 date strings for the `Date`
//! header, and upload-filename tokens.
//!
//! Grounded on SPEC_FULL.md §10.6/§10.7: `chrono` formats both the wire
//! date and the local log timestamp; `rand::rngs::OsRng` replaces the
//! original's time-derived suffix (spec.md §9 flags same-second collisions
//! as a latent bug in that scheme) with a non-reproducible random one.

use chrono::Utc;
use rand::RngCore;

/// Current time formatted per RFC 7231 §7.1.1.1, e.g.
/// `Sun, 06 Nov 1994 08:49:37 GMT`, for the mandatory `Date` header.
pub(crate) fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Synthesizes an upload filename `upload_<YYYYMMDD_HHMMSS>_<rand4>.json`
/// (spec.md §3 `UploadRecord`, §4.6 step 3). The timestamp component aids
/// operators scanning the upload directory; the random suffix is what
/// actually prevents collisions, resolving spec.md §9's open question in
/// favor of a cryptographically-strong source over a time-derived one.
pub(crate) fn upload_filename() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let mut bytes = [0u8; 2];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!("upload_{timestamp}_{:02x}{:02x}.json", bytes[0], bytes[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_date_matches_rfc7231_shape() {
        let date = http_date();
        assert!(date.ends_with(" GMT"));
        assert_eq!(date.len(), "Sun, 06 Nov 1994 08:49:37 GMT".len());
    }

    #[test]
    fn upload_filename_matches_spec_pattern() {
        let name = upload_filename();
        assert!(name.starts_with("upload_"));
        assert!(name.ends_with(".json"));
        let stem = name
            .strip_prefix("upload_")
            .unwrap()
            .strip_suffix(".json")
            .unwrap();
        let mut parts = stem.split('_');
        let date_part = parts.next().unwrap();
        let time_part = parts.next().unwrap();
        let rand_part = parts.next().unwrap();
        assert!(parts.next().is_none());
        assert_eq!(date_part.len(), 8);
        assert_eq!(time_part.len(), 6);
        assert_eq!(rand_part.len(), 4);
        assert!(rand_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn consecutive_draws_are_independent() {
        // A single pair of draws can legitimately collide (4 hex chars is
        // only 65536 values per second), so assert across a batch instead
        // of two calls — this only fails if the suffix were memoized or
        // fixed rather than freshly drawn each time.
        let names: Vec<String> = (0..32).map(|_| upload_filename()).collect();
        let first = &names[0];
        assert!(
            names.iter().any(|name| name != first),
            "32 draws all landed on the same suffix"
        );
    }
}
