//! Image decoding and fit-within resizing

pub mod resize;

pub use resize::{fit_within, resize_to_fit, select_filter};
