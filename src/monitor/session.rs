//! Mailbox operations behind a trait so the scanner can be exercised
//! against a scripted session in tests.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::net::TcpStream;
use tracing::debug;

type LiveSession = imap::Session<native_tls::TlsStream<TcpStream>>;

/// Blocking mailbox operations one scan cycle needs.
pub trait MailSession {
    /// SELECT the inbox. Subsequent searches and fetches target it.
    fn select_inbox(&mut self) -> Result<()>;

    /// UID SEARCH UNSEEN SINCE `date`, returned in ascending UID order.
    /// SINCE has day granularity; the caller still applies the fine-grained
    /// timestamp check per message.
    fn search_unseen_since(&mut self, date: NaiveDate) -> Result<Vec<u32>>;

    /// Fetch one message's full raw bytes without touching its flags.
    fn fetch_raw(&mut self, uid: u32) -> Result<Vec<u8>>;
}

/// An authenticated IMAP session plus the selected-mailbox flag the
/// teardown path needs (CLOSE is only valid after a SELECT).
pub struct ImapMailbox {
    session: LiveSession,
    mailbox_selected: bool,
}

impl ImapMailbox {
    pub(crate) fn new(session: LiveSession) -> Self {
        Self {
            session,
            mailbox_selected: false,
        }
    }

    pub(crate) fn mailbox_selected(&self) -> bool {
        self.mailbox_selected
    }

    pub(crate) fn close(&mut self) -> Result<()> {
        self.session.close()?;
        self.mailbox_selected = false;
        Ok(())
    }

    pub(crate) fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        Ok(())
    }
}

impl MailSession for ImapMailbox {
    fn select_inbox(&mut self) -> Result<()> {
        self.session.select("INBOX")?;
        self.mailbox_selected = true;
        Ok(())
    }

    fn search_unseen_since(&mut self, date: NaiveDate) -> Result<Vec<u32>> {
        let query = format!("UNSEEN SINCE {}", date.format("%d-%b-%Y"));
        debug!(%query, "searching");

        let mut uids: Vec<u32> = self.session.uid_search(&query)?.into_iter().collect();
        uids.sort_unstable();
        Ok(uids)
    }

    fn fetch_raw(&mut self, uid: u32) -> Result<Vec<u8>> {
        // PEEK keeps the engine from flipping the \Seen flag itself.
        let fetches = self.session.uid_fetch(uid.to_string(), "BODY.PEEK[]")?;
        let fetch = fetches
            .iter()
            .next()
            .ok_or_else(|| anyhow!("server returned no data for uid {uid}"))?;
        let raw = fetch
            .body()
            .ok_or_else(|| anyhow!("fetch response for uid {uid} had no body"))?;
        Ok(raw.to_vec())
    }
}
