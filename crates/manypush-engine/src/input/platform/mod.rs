//! Platform event translation.

mod winit;

pub use self::winit::{TouchTranslator, MOUSE_TOUCH_ID};
