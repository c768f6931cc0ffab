//! One scan cycle: search, fetch, decode, filter, first match wins.

use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::monitor::decode;
use crate::monitor::error::{MonitorError, Result};
use crate::monitor::filter;
use crate::monitor::session::MailSession;

/// Per-cycle filter settings. Built fresh for every scan and not retained;
/// empty filter strings impose no constraint.
#[derive(Debug, Clone)]
pub struct ScanCriteria {
    pub time_window: Duration,
    pub sender_filter: String,
    pub keyword_filter: String,
}

/// Run one scan cycle over an already-connected session.
///
/// Returns `Ok(true)` as soon as an unread message inside the time window
/// passes every active filter; candidates after the first match are never
/// fetched. A failed fetch or decode only skips that one message. Only
/// connection- and search-level failures abort the cycle.
pub fn scan<S: MailSession>(session: &mut S, criteria: &ScanCriteria) -> Result<bool> {
    session.select_inbox().map_err(MonitorError::Connection)?;

    let threshold = Utc::now() - criteria.time_window;
    debug!(threshold = %threshold.format("%Y-%m-%d %H:%M:%S UTC"), "recency lower bound");

    // SINCE is a day-granularity pre-filter; the Date header check below
    // is the authoritative one.
    let uids = session
        .search_unseen_since(threshold.date_naive())
        .map_err(MonitorError::Search)?;
    info!(candidates = uids.len(), since = %threshold.date_naive(), "unseen search complete");

    if uids.is_empty() {
        return Ok(false);
    }

    let threshold_ts = threshold.timestamp();
    let total = uids.len();
    for (idx, uid) in uids.into_iter().enumerate() {
        debug!(uid, n = idx + 1, total, "checking candidate");

        let raw = match session.fetch_raw(uid) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(uid, error = %err, "fetch failed, skipping message");
                continue;
            }
        };

        let parsed = match mailparse::parse_mail(&raw) {
            Ok(mail) => mail,
            Err(err) => {
                warn!(uid, error = %err, "unparsable message, skipping");
                continue;
            }
        };

        // Stale messages slip through the coarse SINCE bound; drop them
        // here. An unreadable Date header fails open.
        if !filter::within_window(decode::header_timestamp(&parsed), threshold_ts) {
            debug!(uid, "received outside the time window, skipping");
            continue;
        }

        let from_raw = decode::raw_from(&parsed);
        let from = decode::decoded_from(&parsed);
        let subject = decode::decoded_subject(&parsed);
        debug!(uid, from = %from, subject = %subject, "candidate headers");

        if !filter::sender_matches(&criteria.sender_filter, &from_raw) {
            debug!(uid, "sender filter not matched");
            continue;
        }

        let body = decode::message_body(&parsed);
        debug!(uid, body_chars = body.chars().count(), "body extracted");

        if !filter::keyword_matches(&criteria.keyword_filter, &body) {
            debug!(uid, "keyword filter not matched");
            continue;
        }

        info!(uid, from = %from, subject = %subject, "matching unread message found");
        return Ok(true);
    }

    info!("no unread message matched");
    Ok(false)
}
