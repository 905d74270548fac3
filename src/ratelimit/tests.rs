//! Tests for the rate-limit module

use super::store::{format_snapshot, parse_snapshot};
use super::*;
use crate::http::ResponseHeaders;
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use test_case::test_case;

const NOW: i64 = 1_700_000_000;

fn policy(fallback: u64, limit: u64) -> DelayPolicy {
    DelayPolicy {
        fallback_secs: fallback,
        limit_secs: limit,
        ..DelayPolicy::default()
    }
}

// ============================================================================
// Header Extraction Tests
// ============================================================================

#[test]
fn test_headers_all_present() {
    let headers: ResponseHeaders = [
        ("x-rate-limit-remaining", "14"),
        ("x-rate-limit-limit", "15"),
        ("x-rate-limit-reset", "1700000900"),
        ("content-type", "application/json"),
    ]
    .into_iter()
    .collect();

    let extracted = RateLimitHeaders::from_headers(&headers);
    assert_eq!(extracted.remaining, Some(14));
    assert_eq!(extracted.limit, Some(15));
    assert_eq!(extracted.reset_epoch, Some(1_700_000_900));
    assert!(!extracted.is_empty());
}

#[test]
fn test_headers_absent_on_unlimited_endpoint() {
    let headers: ResponseHeaders = [("content-type", "application/json")]
        .into_iter()
        .collect();

    let extracted = RateLimitHeaders::from_headers(&headers);
    assert!(extracted.is_empty());
    assert_eq!(extracted, RateLimitHeaders::default());
}

#[test]
fn test_headers_mixed_case_names() {
    let headers: ResponseHeaders = [("X-Rate-Limit-Remaining", "3")].into_iter().collect();

    let extracted = RateLimitHeaders::from_headers(&headers);
    assert_eq!(extracted.remaining, Some(3));
    assert_eq!(extracted.limit, None);
}

#[test]
fn test_headers_unparseable_values_are_absent() {
    let headers: ResponseHeaders = [
        ("x-rate-limit-remaining", "lots"),
        ("x-rate-limit-reset", " 1700000900 "),
    ]
    .into_iter()
    .collect();

    let extracted = RateLimitHeaders::from_headers(&headers);
    assert_eq!(extracted.remaining, None);
    assert_eq!(extracted.reset_epoch, Some(1_700_000_900));
}

// ============================================================================
// RateLimitState Tests
// ============================================================================

#[test]
fn test_state_unknown_is_not_exhausted() {
    let state = RateLimitState::unknown();
    assert!(!state.is_exhausted());
    assert_eq!(state.to_string(), "remaining=? limit=? reset=?");
}

#[test]
fn test_state_apply_replaces_all_fields() {
    let mut state = RateLimitState::new(5, 15, NOW);
    state.apply(RateLimitHeaders {
        remaining: Some(0),
        limit: None,
        reset_epoch: Some(NOW + 60),
    });

    assert!(state.is_exhausted());
    assert_eq!(state.limit, None);
    assert_eq!(state.reset_epoch, Some(NOW + 60));
}

#[test]
fn test_state_refill_policies() {
    let mut state = RateLimitState::new(0, 15, NOW);
    state.refill_with(RefillPolicy::Keep);
    assert_eq!(state.remaining, Some(0));

    state.refill_with(RefillPolicy::Limit);
    assert_eq!(state.remaining, Some(15));

    let mut unknown_limit = RateLimitState {
        remaining: Some(0),
        limit: None,
        reset_epoch: Some(NOW),
    };
    unknown_limit.refill();
    assert_eq!(unknown_limit.remaining, None);
}

// ============================================================================
// Delay Scheduler Tests
// ============================================================================

#[test_case(Some(NOW + 5), 6 ; "reset in five seconds waits six")]
#[test_case(Some(NOW), 1 ; "reset now waits one second margin")]
#[test_case(Some(NOW - 1), 30 ; "reset just passed falls back")]
#[test_case(Some(NOW - 3600), 30 ; "stale reset falls back")]
#[test_case(None, 31 ; "unknown reset waits fallback plus margin")]
#[test_case(Some(NOW + 1999), 900 ; "over-long delay is clamped")]
fn test_compute_delay(target: Option<i64>, expected: u64) {
    let delay = compute_delay(target, NOW, DelayTrigger::RateLimited, &policy(30, 900));
    assert_eq!(delay, Ok(Delay::from_secs(expected)));
}

#[test]
fn test_compute_delay_is_deterministic() {
    let policy = policy(30, 900);
    let first = compute_delay(Some(NOW + 42), NOW, DelayTrigger::Exhausted, &policy);
    let second = compute_delay(Some(NOW + 42), NOW, DelayTrigger::Exhausted, &policy);
    assert_eq!(first, second);
}

#[test]
fn test_compute_delay_never_exceeds_limit() {
    let policy = policy(30, 900);
    for offset in [-100_000, -1, 0, 1, 29, 30, 899, 900, 901, 100_000] {
        let delay = compute_delay(Some(NOW + offset), NOW, DelayTrigger::RateLimited, &policy)
            .unwrap();
        assert!(delay.seconds >= 1, "offset {offset} gave {delay:?}");
        assert!(delay.seconds <= 900, "offset {offset} gave {delay:?}");
    }
}

#[test]
fn test_fallback_larger_than_limit_is_clamped() {
    let delay = compute_delay(None, NOW, DelayTrigger::RateLimited, &policy(1000, 900));
    assert_eq!(delay, Ok(Delay::from_secs(900)));
}

#[test]
fn test_exit_on_delay_aborts_over_long_wait() {
    let policy = DelayPolicy {
        exit_on_delay: true,
        ..policy(30, 900)
    };

    let result = compute_delay(Some(NOW + 1999), NOW, DelayTrigger::RateLimited, &policy);
    assert_eq!(
        result,
        Err(AbortReason::DelayTooLong {
            required_secs: 2000,
            limit_secs: 900
        })
    );
    assert_eq!(result.unwrap_err().exit_code(), 4);

    // Within bounds still sleeps
    let result = compute_delay(Some(NOW + 5), NOW, DelayTrigger::RateLimited, &policy);
    assert_eq!(result, Ok(Delay::from_secs(6)));
}

#[test]
fn test_exit_on_limit_only_aborts_exhausted_windows() {
    let policy = DelayPolicy {
        exit_on_limit: true,
        ..policy(30, 900)
    };

    let exhausted = compute_delay(Some(NOW + 5), NOW, DelayTrigger::Exhausted, &policy);
    assert_eq!(exhausted, Err(AbortReason::WindowExhausted));
    assert_eq!(exhausted.unwrap_err().exit_code(), 3);

    let explicit = compute_delay(Some(NOW + 5), NOW, DelayTrigger::RateLimited, &policy);
    assert_eq!(explicit, Ok(Delay::from_secs(6)));
}

#[test]
fn test_exit_on_limit_takes_precedence_over_exit_on_delay() {
    let policy = DelayPolicy {
        exit_on_limit: true,
        exit_on_delay: true,
        ..policy(30, 900)
    };

    let result = compute_delay(Some(NOW + 5000), NOW, DelayTrigger::Exhausted, &policy);
    assert_eq!(result, Err(AbortReason::WindowExhausted));
}

#[test]
fn test_abort_reason_display() {
    assert_eq!(
        AbortReason::WindowExhausted.to_string(),
        "rate-limit window exhausted"
    );
    assert_eq!(
        AbortReason::DelayTooLong {
            required_secs: 2000,
            limit_secs: 900
        }
        .to_string(),
        "required delay of 2000s exceeds the 900s maximum"
    );
}

// ============================================================================
// Persistence Format Tests
// ============================================================================

#[test_case("0 1700000900", Some(0), Some(1_700_000_900) ; "both fields")]
#[test_case("  12\n1700000900\n", Some(12), Some(1_700_000_900) ; "any whitespace")]
#[test_case("7", Some(7), None ; "remaining only")]
#[test_case("", None, None ; "empty file")]
#[test_case("abc 1700000900", None, Some(1_700_000_900) ; "invalid remaining")]
fn test_parse_snapshot(contents: &str, remaining: Option<u64>, reset: Option<i64>) {
    let state = parse_snapshot(contents);
    assert_eq!(state.remaining, remaining);
    assert_eq!(state.reset_epoch, reset);
    assert_eq!(state.limit, None);
}

#[test]
fn test_format_snapshot_omits_limit() {
    assert_eq!(
        format_snapshot(&RateLimitState::new(0, 15, 1_700_000_900)),
        "0 1700000900\n"
    );
    assert_eq!(
        format_snapshot(&RateLimitState {
            remaining: Some(4),
            limit: Some(15),
            reset_epoch: None
        }),
        "4\n"
    );
    assert_eq!(format_snapshot(&RateLimitState::unknown()), "");
}

// ============================================================================
// Store Tests
// ============================================================================

#[test]
fn test_file_store_missing_file_loads_none() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("limits"));
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_file_store_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("limits.state");
    let store = FileStateStore::new(&path);

    store.save(&RateLimitState::new(3, 15, NOW + 600)).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "3 1700000600\n");
    assert!(!dir.path().join("limits.tmp").exists());

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.remaining, Some(3));
    assert_eq!(loaded.reset_epoch, Some(NOW + 600));
    assert_eq!(loaded.limit, None);
}

#[test]
fn test_file_store_overwrites_previous_snapshot() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("limits"));

    store.save(&RateLimitState::new(10, 15, NOW)).unwrap();
    store.save(&RateLimitState::new(9, 15, NOW)).unwrap();

    assert_eq!(store.load().unwrap().unwrap().remaining, Some(9));
}

#[test]
fn test_file_store_leaves_sibling_tmp_file_alone() {
    let dir = tempdir().unwrap();
    let unrelated = dir.path().join("foo.tmp");
    std::fs::write(&unrelated, "keep me").unwrap();

    let store = FileStateStore::new(dir.path().join("foo.state"));
    store.save(&RateLimitState::new(3, 15, NOW)).unwrap();

    assert_eq!(std::fs::read_to_string(&unrelated).unwrap(), "keep me");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("foo.state")).unwrap(),
        format!("3 {NOW}\n")
    );
    assert!(!dir.path().join("foo.state.tmp").exists());
}

#[test]
fn test_file_store_unwritable_path() {
    let dir = tempdir().unwrap();
    let store = FileStateStore::new(dir.path().join("missing").join("limits"));

    let err = store.save(&RateLimitState::unknown()).unwrap_err();
    assert!(err.to_string().contains("Failed to write state file"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_memory_store() {
    let store = MemoryStateStore::new();
    assert_eq!(store.load().unwrap(), None);
    assert_eq!(store.save_count(), 0);

    store.save(&RateLimitState::new(1, 2, NOW)).unwrap();
    store.save(&RateLimitState::new(0, 2, NOW)).unwrap();

    assert_eq!(store.save_count(), 2);
    assert_eq!(store.latest(), Some(RateLimitState::new(0, 2, NOW)));
    assert_eq!(store.load().unwrap(), Some(RateLimitState::new(0, 2, NOW)));

    let seeded = MemoryStateStore::with_state(RateLimitState::new(0, 2, NOW));
    assert!(seeded.load().unwrap().unwrap().is_exhausted());
}
