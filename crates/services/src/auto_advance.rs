//! Cancellable delayed advance, driven by tokio timers.

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::sessions::AdvanceTicket;

/// Delivers advance tickets after a delay.
///
/// At most one ticket is pending: scheduling a new one aborts the previous
/// timer. Tickets still carry the session generation, so a timer that fires
/// after a restart is rejected by `QuizSession::advance_for` even if it
/// escaped cancellation.
#[derive(Debug)]
pub struct AdvanceScheduler {
    tx: mpsc::UnboundedSender<AdvanceTicket>,
    pending: Option<JoinHandle<()>>,
}

impl AdvanceScheduler {
    /// Creates a scheduler and the receiver its tickets arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AdvanceTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, pending: None }, rx)
    }

    /// Sends `ticket` after `delay`, replacing any pending ticket.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, ticket: AdvanceTicket, delay: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        debug!("advance scheduled in {delay:?}: {ticket:?}");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // receiver gone means the host has exited
            let _ = tx.send(ticket);
        }));
    }

    /// Aborts the pending ticket. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AdvanceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
