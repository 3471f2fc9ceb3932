//! Outgoing chat messages produced by a command

use tokio::sync::mpsc;

/// Handle a command uses to emit plain-text replies in order
///
/// Replies are delivered as soon as they are emitted, so a front end can show
/// a progress notice while the command is still waiting on the network.
#[derive(Debug, Clone)]
pub struct ReplySink {
    tx: mpsc::UnboundedSender<String>,
}

impl ReplySink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit a plain-text message
    ///
    /// A receiver that went away (client disconnected) is not an error for
    /// the command; the message is dropped.
    pub fn plain(&self, text: impl Into<String>) {
        let _ = self.tx.send(text.into());
    }
}

/// Drain every message left in `rx`
pub fn collect_replies(mut rx: mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut replies = Vec::new();
    while let Ok(message) = rx.try_recv() {
        replies.push(message);
    }
    replies
}
