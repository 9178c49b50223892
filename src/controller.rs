//! The game loop: one thread, two event sources.
//!
//! [`EventSource`] merges the fixed-period tick with the byte channel fed by
//! the capture thread and hands out exactly one [`LoopEvent`] per call.
//! [`run`] reacts to each event in turn and is the only code that mutates the
//! `Game`.

use std::io::Write;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::debug;

use crate::compute::{apply_intent, tick};
use crate::display;
use crate::entities::Game;
use crate::input::Intent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopEvent {
    Tick,
    Input(u8),
}

pub struct EventSource {
    rx: Receiver<u8>,
    period: Duration,
    next_tick: Instant,
    input_open: bool,
    last_was_tick: bool,
}

impl EventSource {
    /// The first tick is due one `period` from now.
    pub fn new(rx: Receiver<u8>, period: Duration) -> Self {
        Self {
            rx,
            period,
            next_tick: Instant::now() + period,
            input_open: true,
            last_was_tick: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Block until the next event.
    ///
    /// A due tick is returned before queued input, so a flood of key presses
    /// cannot hold back the clock. The one exception: when the previous event
    /// was also a tick, one queued byte goes first. A frame that takes longer
    /// than a period to draw therefore never locks input out. Input bytes are
    /// never dropped; they wait in the channel.
    pub fn next_event(&mut self) -> LoopEvent {
        let event = self.wait_for_event();
        self.last_was_tick = event == LoopEvent::Tick;
        event
    }

    fn wait_for_event(&mut self) -> LoopEvent {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                if self.last_was_tick && self.input_open {
                    match self.rx.try_recv() {
                        Ok(byte) => return LoopEvent::Input(byte),
                        Err(TryRecvError::Empty) => {}
                        Err(TryRecvError::Disconnected) => self.close_input(),
                    }
                }
                self.schedule_after(now);
                return LoopEvent::Tick;
            }
            let wait = self.next_tick - now;

            if !self.input_open {
                thread::sleep(wait);
                continue;
            }
            match self.rx.recv_timeout(wait) {
                Ok(byte) => return LoopEvent::Input(byte),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => self.close_input(),
            }
        }
    }

    // Logged at debug: without a log file, records land on the game screen.
    fn close_input(&mut self) {
        debug!("input channel closed, continuing with ticks only");
        self.input_open = false;
    }

    // A late tick pushes the schedule back rather than firing a catch-up burst.
    fn schedule_after(&mut self, now: Instant) {
        self.next_tick += self.period;
        if self.next_tick <= now {
            self.next_tick = now + self.period;
        }
    }
}

/// Drive the game until it is over: simulate then render on every tick,
/// decode and apply every input byte as it arrives.
pub fn run<W: Write>(out: &mut W, state: &mut Game, events: &mut EventSource) -> Result<()> {
    debug!("game loop started, tick period {:?}", events.period());

    while !state.is_over() {
        match events.next_event() {
            LoopEvent::Tick => {
                tick(state);
                display::render(out, state)
                    .with_context(|| format!("failed to render tick {}", state.frame))?;
            }
            LoopEvent::Input(byte) => {
                if let Some(intent) = Intent::from_byte(byte) {
                    apply_intent(state, intent);
                }
            }
        }
    }

    debug!("game loop finished after {} ticks", state.frame);
    Ok(())
}
