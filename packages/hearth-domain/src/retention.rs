use time::{Duration, OffsetDateTime};

/// When a chat row written at `created_at` falls out of retention.
pub fn message_expiry(created_at: OffsetDateTime, ttl_days: i64) -> OffsetDateTime {
	created_at + Duration::days(ttl_days)
}
