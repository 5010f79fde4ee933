use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::system::snapshot::Snapshot;

#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Snapshot(Box<Snapshot>),
}

/// Single consumer for everything the UI reacts to: terminal input and
/// snapshots posted by the sampling loop.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    _task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new(mut snapshots: mpsc::UnboundedReceiver<Snapshot>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Event>();

        let task = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            let mut snapshots_open = true;

            loop {
                tokio::select! {
                    maybe_event = reader.next() => {
                        match maybe_event {
                            Some(Ok(evt)) => {
                                let mapped = match evt {
                                    CrosstermEvent::Key(key) => Some(Event::Key(key)),
                                    CrosstermEvent::Resize(_, _) => Some(Event::Resize),
                                    _ => None,
                                };
                                if let Some(e) = mapped
                                    && tx.send(e).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Err(_)) => break,
                            None => break,
                        }
                    }
                    maybe_snapshot = snapshots.recv(), if snapshots_open => {
                        match maybe_snapshot {
                            Some(snapshot) => {
                                if tx.send(Event::Snapshot(Box::new(snapshot))).is_err() {
                                    break;
                                }
                            }
                            None => snapshots_open = false,
                        }
                    }
                }
            }
        });

        Self { rx, _task: task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
