#![allow(dead_code)]
mod builders;
mod observer;

pub use builders::*;
pub use observer::{Event, RecordingObserver};
