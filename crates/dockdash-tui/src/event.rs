//! Terminal event handling

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// Events the app loop reacts to
#[derive(Debug, Clone)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// The refresh worker installed a new snapshot
    Refreshed,
}

/// Event handler that reads the terminal on a blocking thread
pub struct EventHandler {
    /// Event receiver
    rx: mpsc::UnboundedReceiver<Event>,
    /// Sender shared with other producers (the refresh worker)
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler polling the terminal every `poll_rate`
    pub fn new(poll_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tx_clone = tx.clone();

        tokio::task::spawn_blocking(move || {
            // Checking between polls lets the thread exit soon after the app drops the receiver
            while !tx_clone.is_closed() {
                if !event::poll(poll_rate).unwrap_or(false) {
                    continue;
                }
                let forwarded = match event::read() {
                    Ok(CrosstermEvent::Key(key)) => tx_clone.send(Event::Key(key)),
                    Ok(CrosstermEvent::Resize(w, h)) => tx_clone.send(Event::Resize(w, h)),
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for other event producers
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
