/*
 * The seam between the window handlers and the operating system. Each method
 * corresponds to one native primitive (or a fixed pair of them) and works on
 * the single window the implementation is bound to. The Win32 implementation
 * lives in `win32::Win32Window`; handlers only ever see `&dyn NativeWindow`,
 * which keeps the AppBar protocol and the fullscreen state machine testable
 * without a desktop.
 *
 * Implementations take `&self`: the OS owns the mutable window state, and
 * anything cached on the Rust side (the taskbar interface) is interior.
 */
use crate::error::Result as PlatformResult;
use crate::types::{
    AccentPolicy, AppBarEdge, Dispatch, HitTest, Margins, Rect, ShowState, SysCommand,
    TaskbarProgress, WindowPos,
};

pub trait NativeWindow {
    // Geometry
    fn window_rect(&self) -> PlatformResult<Rect>;
    fn client_rect(&self) -> PlatformResult<Rect>;
    fn set_window_pos(&self, pos: WindowPos) -> PlatformResult<()>;
    /// Full rectangle of the monitor nearest to the window, work area not subtracted.
    fn monitor_rect(&self) -> PlatformResult<Rect>;
    /// Primary screen size in physical pixels.
    fn screen_size(&self) -> (i32, i32);
    /// Effective DPI of the window's monitor, `None` when the query is unavailable.
    fn monitor_dpi(&self) -> Option<u32>;
    /// Resizes the embedded content view (a child window) to `rect`.
    fn resize_content_view(&self, rect: Rect) -> PlatformResult<()>;
    /// Screen rectangle of the first child window, `None` if there is no child.
    fn child_rect(&self) -> PlatformResult<Option<Rect>>;
    fn set_child_pos(&self, pos: WindowPos) -> PlatformResult<()>;

    // Style bits
    fn style(&self) -> u32;
    fn set_style(&self, style: u32);
    fn ex_style(&self) -> u32;
    fn set_ex_style(&self, ex_style: u32);
    fn class_style(&self) -> u32;
    fn set_class_style(&self, class_style: u32);

    // Show state and activation
    fn show_state(&self) -> ShowState;
    fn is_zoomed(&self) -> bool;
    fn is_visible(&self) -> bool;
    fn is_foreground(&self) -> bool;
    fn sys_command(&self, command: SysCommand, dispatch: Dispatch) -> PlatformResult<()>;
    fn show(&self);
    fn hide(&self);
    fn set_foreground(&self);
    /// Hands the foreground to the next visible window in z-order.
    /// Returns false if there is none.
    fn activate_next_visible(&self) -> bool;

    // AppBar messages
    fn appbar_new(&self, callback_message: u32) -> bool;
    fn appbar_remove(&self);
    fn appbar_query_pos(&self, edge: AppBarEdge, rect: Rect) -> Rect;
    fn appbar_set_pos(&self, edge: AppBarEdge, rect: Rect) -> Rect;

    // Chrome
    fn title(&self) -> PlatformResult<String>;
    fn set_title(&self, title: &str) -> PlatformResult<()>;
    fn title_bar_height(&self) -> i32;
    fn extend_frame_into_client_area(&self, margins: Margins) -> PlatformResult<()>;
    fn set_layered_alpha(&self, alpha: u8) -> PlatformResult<()>;
    /// Returns false when the composition API is unavailable.
    fn set_accent_policy(&self, policy: AccentPolicy) -> bool;
    /// `Some(true)` for a light app theme, `None` if the preference can't be read.
    fn apps_use_light_theme(&self) -> Option<bool>;
    fn set_dark_decorations(&self, enabled: bool) -> PlatformResult<()>;
    fn set_icon_from_file(&self, path: &str) -> PlatformResult<()>;

    // Taskbar
    /// Acquires the taskbar interface. Later calls are no-ops.
    fn acquire_taskbar(&self) -> PlatformResult<()>;
    fn set_taskbar_progress(&self, progress: TaskbarProgress) -> PlatformResult<()>;
    fn set_taskbar_tab(&self, present: bool) -> PlatformResult<()>;

    // Pointer
    fn release_capture(&self);
    fn cursor_pos(&self) -> (i32, i32);
    fn post_nc_button_down(&self, hit: HitTest, at: (i32, i32)) -> PlatformResult<()>;
    fn post_nc_double_click(&self, hit: HitTest, at: (i32, i32)) -> PlatformResult<()>;
    /// Shows the system menu at `at` and returns the chosen command, if any.
    fn track_system_menu(&self, at: (i32, i32)) -> Option<u32>;

    fn post_quit(&self);
}
