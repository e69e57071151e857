/*
 * Per-window control surface for a host UI framework on Windows. The host
 * forwards method-channel calls (a method name plus a JSON argument map) to
 * `PlatformInterface::handle_method_call`; each call is parsed into a typed
 * `WindowCommand` and executed against the addressed window: bounds and
 * z-order, AppBar docking, fullscreen transitions, chrome, opacity and
 * taskbar progress.
 *
 * Everything above the `NativeWindow` seam is portable, so the docking
 * protocol and the fullscreen state machine compile and test on every
 * platform. The Win32 backend (`win32::Win32Window`) is only built on Windows.
 */
pub mod app;
pub(crate) mod command_executor;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod native;
pub mod types;
pub(crate) mod window_common;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(target_os = "windows")]
pub mod win32;

pub use app::{PlatformInterface, WindowFactory};
pub use commands::WindowCommand;
pub use config::ManagerConfig;
pub use error::{PlatformError, Result as PlatformResult};
pub use handlers::appbar_handler::DockRequest;
pub use handlers::chrome_handler::Brightness;
pub use handlers::placement_handler::{BoundsRequest, LogicalSize, SizeConstraint, TrackSizeLimits};
pub use native::NativeWindow;
pub use types::{Bounds, DockState, Rect, WindowId};
#[cfg(target_os = "windows")]
pub use win32::Win32Window;
