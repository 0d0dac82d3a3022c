#![allow(dead_code)]

pub mod client;
pub mod fixtures;

pub use client::{MockUploadClient, RecordedUpload};
pub use fixtures::{read_log, write_jpeg, write_png, CountingThumbnailer};

use shoebox_core::BatchEvent;
use tokio::sync::mpsc::UnboundedReceiver;

/// Everything sent so far on an event channel.
pub fn drain_events(rx: &mut UnboundedReceiver<BatchEvent>) -> Vec<BatchEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
