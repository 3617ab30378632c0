//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.  `Tick`
//! is the animation frame: it fires every `frame_interval` whether or not
//! input is arriving, so a long scroll burst still gets frames.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal changed size; the next draw picks up the new area.
    Resize,
    /// Animation frame, with the seconds elapsed since the previous one.
    Tick(f64),
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(frame_interval: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut last_tick = Instant::now();
        loop {
            let timeout = frame_interval.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(ev) = event::read() {
                    if let Some(app_event) = translate(ev) {
                        if tx.send(app_event).is_err() {
                            break; // receiver dropped
                        }
                    }
                }
            }

            let elapsed = last_tick.elapsed();
            if elapsed >= frame_interval {
                last_tick = Instant::now();
                if tx.send(AppEvent::Tick(elapsed.as_secs_f64())).is_err() {
                    break;
                }
            }
        }
    });

    rx
}

/// The crossterm events the preview reacts to.
fn translate(ev: CtEvent) -> Option<AppEvent> {
    match ev {
        CtEvent::Key(k) => Some(AppEvent::Key(k)),
        CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
        CtEvent::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}
