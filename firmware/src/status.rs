#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Link counters shared between the USB and kiosk tasks.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

static CONSOLE_ATTACHED: AtomicBool = AtomicBool::new(false);
/// Console frames dropped because a queue was full.
static DROPPED_FRAMES: AtomicU32 = AtomicU32::new(0);

pub fn set_console_attached(attached: bool) {
    CONSOLE_ATTACHED.store(attached, Ordering::Relaxed);
}

pub fn console_attached() -> bool {
    CONSOLE_ATTACHED.load(Ordering::Relaxed)
}

pub fn record_dropped_frame() -> u32 {
    DROPPED_FRAMES.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
}

pub fn dropped_frames() -> u32 {
    DROPPED_FRAMES.load(Ordering::Relaxed)
}
