use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};

/// Input for the main loop. Only key presses carry data; everything else
/// (resizes, poll timeouts) just needs a redraw and surfaces as `Tick`.
/// Ticks are also what ages out the save-flash indicator.
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    /// Spawn the input thread. It exits on its own once the receiver side
    /// is dropped.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => AppEvent::Key(key),
                        _ => AppEvent::Tick,
                    }
                } else {
                    AppEvent::Tick
                };
                if tx.send(event).is_err() {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_flow_without_terminal_input() {
        let events = EventHandler::new(Duration::from_millis(10));
        match events.next().unwrap() {
            AppEvent::Tick => {}
            AppEvent::Key(_) => panic!("no key input expected in tests"),
        }
    }
}
