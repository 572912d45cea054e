//! Audit stamps: `<RFC3339 UTC time> <actor>`.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{LitError, Result};

/// Stamp the current time for `actor`.
#[must_use]
pub fn stamp(actor: &str) -> String {
    stamp_at(Utc::now(), actor)
}

/// Stamp a given time for `actor`.
#[must_use]
pub fn stamp_at(time: DateTime<Utc>, actor: &str) -> String {
    format!("{} {}", time.to_rfc3339_opts(SecondsFormat::Secs, true), actor)
}

/// Check that `actor` can sit in a branch header.
///
/// # Errors
///
/// Returns `Validation` if `actor` has control characters or surrounding
/// whitespace.
pub fn check_actor(actor: &str) -> Result<()> {
    if actor.chars().any(char::is_control) {
        return Err(LitError::validation(
            "actor",
            format!("{actor:?} contains control characters"),
        ));
    }
    if actor.trim() != actor {
        return Err(LitError::validation(
            "actor",
            format!("{actor:?} has leading or trailing whitespace"),
        ));
    }
    Ok(())
}

/// Split a stamp back into its time and actor.
///
/// Returns `None` for an empty string or a time that does not parse.
#[must_use]
pub fn parse_stamp(stamp: &str) -> Option<(DateTime<Utc>, &str)> {
    let (time, actor) = stamp.split_once(' ').unwrap_or((stamp, ""));
    let time = DateTime::parse_from_rfc3339(time).ok()?;
    Some((time.with_timezone(&Utc), actor))
}
