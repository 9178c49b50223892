//! Key decoding and the input capture thread.
//!
//! The capture thread forwards raw bytes untouched; mapping a byte to an
//! [`Intent`] happens on the loop controller's side so capture never needs to
//! look at game state.

use std::io::Read;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::debug;

/// Ctrl-C arrives as a plain byte once the terminal is in raw mode.
const CTRL_C: u8 = 0x03;

/// A decoded player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    Quit,
}

impl Intent {
    /// Decode one key byte. Letters are case-insensitive; anything unmapped
    /// yields `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte.to_ascii_lowercase() {
            b'w' => Some(Intent::MoveUp),
            b's' => Some(Intent::MoveDown),
            b'a' => Some(Intent::MoveLeft),
            b'd' => Some(Intent::MoveRight),
            b' ' => Some(Intent::Fire),
            b'q' | CTRL_C => Some(Intent::Quit),
            _ => None,
        }
    }
}

/// Dedicate a thread to blocking single-byte reads from `reader`, sending
/// every byte through `tx` in arrival order.
///
/// The thread ends on EOF, on a read error, or once the receiving side has
/// been dropped. In the running game it usually just dies with the process.
pub fn spawn_capture<R>(reader: R, tx: Sender<u8>) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        for byte in reader.bytes() {
            match byte {
                Ok(b) => {
                    if tx.send(b).is_err() {
                        debug!("input receiver dropped, stopping capture");
                        break;
                    }
                }
                Err(e) => {
                    debug!("input read failed: {e}");
                    break;
                }
            }
        }
        debug!("input capture finished");
    })
}
