//! Host events and the bus that delivers them.

use std::future::Future;
use std::path::PathBuf;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default number of undelivered events kept per subscriber.
pub const DEFAULT_CAPACITY: usize = 64;

/// A user command. Each takes no arguments and returns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Format the active code cell.
    FormatCell,
    /// Format every code cell of the active notebook.
    FormatAllCells,
    /// Format the active editor buffer.
    FormatEditor,
    ToggleFormatOnRun,
    ToggleFormatOnSave,
    ToggleSortImports,
    /// Re-resolve configuration for the active document.
    ReloadConfiguration,
}

/// Something the host reports to the formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The user switched to another document.
    ActiveDocumentChanged { path: PathBuf },
    /// A notebook cell is about to be executed.
    CellExecutionScheduled { path: PathBuf, cell: usize },
    /// A document is about to be saved.
    SaveStarted { path: PathBuf },
    /// The user invoked a command.
    Command(Command),
}

/// Broadcast channel for [`HostEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<HostEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Sends `event` to every subscriber. Returns how many received it.
    pub fn emit(&self, event: HostEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                debug!("No subscribers for {:?}", event);
                0
            }
        }
    }

    /// Calls `handler` for every event emitted from now on.
    ///
    /// `handler` itself is called in emission order on the receiving task;
    /// the future it returns runs on a task of its own. Must be called from
    /// within a Tokio runtime.
    pub fn subscribe<F, Fut>(&self, handler: F) -> Subscription
    where
        F: Fn(HostEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut receiver = self.sender.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        let work = handler(event);
                        tokio::spawn(work);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Dropped {} host events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Subscription { task }
    }
}

/// A live subscription. Dropping it stops delivery.
///
/// Handlers already started run to completion.
#[derive(Debug)]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Stops delivery.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Returns true once the subscription no longer receives events.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn forward(bus: &EventBus) -> (Subscription, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = bus.subscribe(move |event| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(event);
            }
        });
        (subscription, rx)
    }

    #[tokio::test]
    async fn test_emit_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.emit(HostEvent::Command(Command::FormatCell)), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = EventBus::default();
        let (_subscription, mut rx) = forward(&bus);

        assert_eq!(bus.emit(HostEvent::Command(Command::FormatEditor)), 1);

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(HostEvent::Command(Command::FormatEditor)));
    }

    #[tokio::test]
    async fn test_handler_is_called_in_emission_order() {
        let bus = EventBus::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _subscription = bus.subscribe(move |event| {
            let _ = tx.send(event);
            async {}
        });

        let events: Vec<HostEvent> = (0..20)
            .map(|cell| HostEvent::CellExecutionScheduled {
                path: PathBuf::from("nb.ipynb"),
                cell,
            })
            .collect();
        for event in &events {
            bus.emit(event.clone());
        }

        let mut received = Vec::new();
        while received.len() < events.len() {
            let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap();
            received.extend(event);
        }
        assert_eq!(received, events);
    }

    #[tokio::test]
    async fn test_cancel_stops_delivery() {
        let bus = EventBus::default();
        let (subscription, mut rx) = forward(&bus);

        subscription.cancel();
        tokio::task::yield_now().await;
        bus.emit(HostEvent::SaveStarted {
            path: PathBuf::from("a.py"),
        });

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(event, None);
    }
}
