pub mod pointer;
pub mod theme;

pub use pointer::{wire_pointer_listeners, wire_resize, ListenerGuard, SharedListeners};
pub use theme::{wire_color_scheme, ThemeWatcher};
