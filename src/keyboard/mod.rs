//! Keyboard input capture

mod event;
pub mod keymap;
pub mod layout;
mod recorder;

pub use event::{KeyEventType, KeyInput, KeyboardListener};
pub use keymap::{get_key_info, KeyCode, KeyInfo, KEYMAP};
pub use layout::{KeyboardCoordinate, KeyboardLayoutMap};
pub use recorder::{EventRecorder, KeyEvent};
