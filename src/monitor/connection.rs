//! Session lifecycle: TLS connect and login on one side, defensive
//! teardown on the other.

use native_tls::TlsConnector;
use tracing::{info, warn};

use crate::monitor::error::{MonitorError, Result};
use crate::monitor::session::ImapMailbox;

/// Account identity and server endpoint for one IMAP login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

/// Owns at most one live session. Not synchronized: a manager belongs to
/// a single caller at a time.
pub struct ConnectionManager {
    mailbox: Option<ImapMailbox>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self { mailbox: None }
    }

    /// Open a TLS connection and log in.
    ///
    /// App passwords are issued in space-separated groups, so embedded
    /// whitespace is stripped before use. On any failure the manager is
    /// left with no session at all.
    pub fn connect(&mut self, creds: &Credentials) -> Result<&mut ImapMailbox> {
        self.disconnect();

        let password: String = creds
            .password
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        info!(email = %creds.email, host = %creds.host, port = creds.port, "connecting");

        let tls = TlsConnector::builder()
            .build()
            .map_err(|e| MonitorError::Connection(e.into()))?;

        let client = imap::connect((creds.host.as_str(), creds.port), &creds.host, &tls)
            .map_err(|e| MonitorError::Connection(e.into()))?;

        let session = client
            .login(&creds.email, &password)
            .map_err(|e| MonitorError::Connection(e.0.into()))?;

        info!("connected");
        Ok(self.mailbox.insert(ImapMailbox::new(session)))
    }

    /// Tear the session down. Safe to call repeatedly or when nothing was
    /// ever connected; failures during teardown are logged, never
    /// returned. CLOSE is only issued if a mailbox was selected, and
    /// LOGOUT is attempted once either way.
    pub fn disconnect(&mut self) {
        let Some(mut mailbox) = self.mailbox.take() else {
            return;
        };

        info!("disconnecting");
        if mailbox.mailbox_selected() {
            if let Err(err) = mailbox.close() {
                warn!(error = %err, "CLOSE failed during teardown");
            }
        }
        if let Err(err) = mailbox.logout() {
            warn!(error = %err, "LOGOUT failed during teardown");
        }
    }

}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnect_without_session_is_a_no_op() {
        let mut manager = ConnectionManager::new();
        manager.disconnect();
        manager.disconnect();
        assert!(manager.mailbox.is_none());
    }
}
