use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use terminal_shooter::compute::init_state;
use terminal_shooter::controller::{run, EventSource, LoopEvent};
use terminal_shooter::entities::*;

/// Long enough that no tick fires during a test.
const NEVER: Duration = Duration::from_secs(3600);

// ── EventSource ───────────────────────────────────────────────────────────────

#[test]
fn queued_input_is_delivered_before_the_tick_is_due() {
    let (tx, rx) = mpsc::channel();
    let mut events = EventSource::new(rx, NEVER);
    tx.send(b'a').unwrap();
    tx.send(b'd').unwrap();
    assert_eq!(events.next_event(), LoopEvent::Input(b'a'));
    assert_eq!(events.next_event(), LoopEvent::Input(b'd'));
}

#[test]
fn tick_fires_without_input() {
    let (_tx, rx) = mpsc::channel::<u8>();
    let mut events = EventSource::new(rx, Duration::from_millis(5));
    assert_eq!(events.next_event(), LoopEvent::Tick);
    assert_eq!(events.next_event(), LoopEvent::Tick);
}

#[test]
fn due_tick_goes_ahead_of_queued_input() {
    let (tx, rx) = mpsc::channel();
    let mut events = EventSource::new(rx, Duration::from_millis(50));
    for byte in *b"xyz" {
        tx.send(byte).unwrap();
    }
    thread::sleep(Duration::from_millis(120));

    assert_eq!(events.next_event(), LoopEvent::Tick);
    // Late tick re-anchors the schedule, so the queue drains next, in order.
    assert_eq!(events.next_event(), LoopEvent::Input(b'x'));
    assert_eq!(events.next_event(), LoopEvent::Input(b'y'));
    assert_eq!(events.next_event(), LoopEvent::Input(b'z'));
}

#[test]
fn slow_frames_do_not_lock_out_input() {
    let (tx, rx) = mpsc::channel();
    let period = Duration::from_millis(2);
    let mut events = EventSource::new(rx, period);
    assert_eq!(events.next_event(), LoopEvent::Tick);
    tx.send(b'q').unwrap();

    // Every tick is followed by a frame that overruns the period, so the
    // next tick is already due whenever the loop asks again.
    let mut delivered = false;
    for _ in 0..20 {
        thread::sleep(period * 3);
        match events.next_event() {
            LoopEvent::Input(byte) => {
                assert_eq!(byte, b'q');
                delivered = true;
                break;
            }
            LoopEvent::Tick => {}
        }
    }
    assert!(delivered);
}

#[test]
fn late_ticks_still_beat_a_steady_stream_of_input() {
    let (tx, rx) = mpsc::channel();
    let period = Duration::from_millis(2);
    let mut events = EventSource::new(rx, period);
    for _ in 0..50 {
        tx.send(b'a').unwrap();
    }
    thread::sleep(period * 3);

    let mut seen = Vec::new();
    for _ in 0..6 {
        seen.push(events.next_event());
        thread::sleep(period * 3);
    }
    // Overdue at every call: tick and input take turns.
    assert_eq!(
        seen,
        vec![
            LoopEvent::Tick,
            LoopEvent::Input(b'a'),
            LoopEvent::Tick,
            LoopEvent::Input(b'a'),
            LoopEvent::Tick,
            LoopEvent::Input(b'a'),
        ]
    );
}

#[test]
fn closed_input_keeps_ticking() {
    let (tx, rx) = mpsc::channel::<u8>();
    drop(tx);
    let mut events = EventSource::new(rx, Duration::from_millis(5));
    assert_eq!(events.next_event(), LoopEvent::Tick);
    assert_eq!(events.next_event(), LoopEvent::Tick);
}

// ── run ───────────────────────────────────────────────────────────────────────

#[test]
fn run_applies_input_until_quit() {
    let (tx, rx) = mpsc::channel();
    let mut events = EventSource::new(rx, NEVER);
    let mut state = init_state(40, 20, 3);
    for byte in *b"aa x q" {
        tx.send(byte).unwrap();
    }

    let mut out = Vec::new();
    run(&mut out, &mut state, &mut events).unwrap();

    assert!(state.is_over());
    assert_eq!(state.player.x, 18);
    assert_eq!(state.bullets.len(), 2); // the two spaces
    assert_eq!(state.frame, 0);
    assert!(out.is_empty()); // no tick, no frame drawn
}

#[test]
fn run_simulates_and_renders_each_tick() {
    let (_tx, rx) = mpsc::channel::<u8>();
    let mut events = EventSource::new(rx, Duration::from_millis(1));
    let mut state = init_state(40, 20, 1);
    let (px, py) = (state.player.x, state.player.y);
    state
        .enemy_bullets
        .push(Bullet::hostile(px, py - 3, ENEMY_BULLET_GLYPH));

    let mut out = Vec::new();
    run(&mut out, &mut state, &mut events).unwrap();

    assert!(state.is_over());
    assert_eq!(state.frame, 3);
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Controls:").count(), 3);
    assert!(text.contains("Life: 0 | Score: 0 | Stage: 1"));
}
