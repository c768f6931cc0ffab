//! Terminal-bell alert sink.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tracing::info;

/// Ring the terminal bell `repeat` times, spaced out so the rings come
/// through as separate beeps. Write failures are ignored; an alert must
/// never take the watch loop down.
pub fn ring_bell(repeat: u32) {
    info!(repeat, "ringing alert bell");

    let mut out = io::stdout();
    for i in 0..repeat {
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
        if i + 1 < repeat {
            thread::sleep(Duration::from_millis(500));
        }
    }
}
