/*
 * In-memory `NativeWindow` used by the unit tests. It keeps just enough
 * window state for the handlers to observe their own effects (rect, style
 * bits, show state) and records every mutating call so tests can assert on
 * the exact OS conversation.
 */
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{PlatformError, Result as PlatformResult};
use crate::native::NativeWindow;
use crate::types::{
    AccentPolicy, AppBarEdge, Dispatch, HitTest, Margins, PosFlags, Rect, ShowState, SysCommand,
    TaskbarProgress, WindowPos, style,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SetWindowPos(WindowPos),
    SetStyle(u32),
    SetExStyle(u32),
    SetClassStyle(u32),
    SysCommand(SysCommand, Dispatch),
    Show,
    Hide,
    SetForeground,
    AppBarNew,
    AppBarRemove,
    AppBarQueryPos(AppBarEdge, Rect),
    AppBarSetPos(AppBarEdge, Rect),
    ResizeContentView(Rect),
    SetChildPos(WindowPos),
    SetTitle(String),
    ExtendFrame(Margins),
    SetLayeredAlpha(u8),
    SetAccentPolicy(AccentPolicy),
    SetDarkDecorations(bool),
    SetIcon(String),
    AcquireTaskbar,
    TaskbarProgress(TaskbarProgress),
    TaskbarTab(bool),
    ReleaseCapture,
    NcButtonDown(HitTest),
    NcDoubleClick(HitTest),
    PostQuit,
}

#[derive(Debug)]
pub(crate) struct FakeState {
    pub rect: Rect,
    pub monitor: Rect,
    pub screen: (i32, i32),
    pub dpi: Option<u32>,
    pub style: u32,
    pub ex_style: u32,
    pub class_style: u32,
    pub show_state: ShowState,
    pub visible: bool,
    pub foreground: bool,
    pub title: String,
    pub light_theme: Option<bool>,
    pub accent_supported: bool,
    pub appbar_accepts: bool,
    /// Pixels other bars already reserve on the left edge; QueryPos moves past them.
    pub reserved_left: i32,
    pub menu_choice: Option<u32>,
    /// Frame of the embedded child view, if the window has one.
    pub child: Option<Rect>,
    pub fail_set_window_pos: bool,
    pub calls: Vec<Call>,
}

impl Default for FakeState {
    fn default() -> Self {
        FakeState {
            rect: Rect::new(100, 100, 900, 700),
            monitor: Rect::new(0, 0, 1920, 1080),
            screen: (1920, 1080),
            dpi: Some(96),
            style: style::WS_OVERLAPPEDWINDOW | style::WS_VISIBLE,
            ex_style: 0,
            class_style: 0,
            show_state: ShowState::Normal,
            visible: true,
            foreground: true,
            title: "untitled".to_string(),
            light_theme: Some(false),
            accent_supported: true,
            appbar_accepts: true,
            reserved_left: 0,
            menu_choice: None,
            child: Some(Rect::new(108, 131, 892, 692)),
            fail_set_window_pos: false,
            calls: Vec::new(),
        }
    }
}

type SetPosHook = Rc<dyn Fn(&WindowPos)>;

/// Cloneable handle; tests keep one clone to inspect what the handlers did.
#[derive(Clone, Default)]
pub(crate) struct FakeWindow {
    state: Rc<RefCell<FakeState>>,
    on_set_window_pos: Rc<RefCell<Option<SetPosHook>>>,
}

impl std::fmt::Debug for FakeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeWindow")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl FakeWindow {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_state(configure: impl FnOnce(&mut FakeState)) -> Self {
        let fake = Self::new();
        configure(&mut fake.state.borrow_mut());
        fake
    }

    pub(crate) fn state(&self) -> std::cell::Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> std::cell::RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    /// Runs `hook` inside every `set_window_pos`, the way Windows sends
    /// WM_GETMINMAXINFO back to the host while the call is in flight.
    pub(crate) fn on_set_window_pos(&self, hook: impl Fn(&WindowPos) + 'static) {
        *self.on_set_window_pos.borrow_mut() = Some(Rc::new(hook));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl NativeWindow for FakeWindow {
    fn window_rect(&self) -> PlatformResult<Rect> {
        Ok(self.state.borrow().rect)
    }

    fn client_rect(&self) -> PlatformResult<Rect> {
        let rect = self.state.borrow().rect;
        Ok(Rect::new(0, 0, rect.width(), rect.height()))
    }

    fn set_window_pos(&self, pos: WindowPos) -> PlatformResult<()> {
        if self.state.borrow().fail_set_window_pos {
            return Err(PlatformError::OperationFailed("SetWindowPos refused".into()));
        }
        self.record(Call::SetWindowPos(pos));
        let hook = self.on_set_window_pos.borrow().clone();
        if let Some(hook) = hook {
            hook(&pos);
        }
        let mut state = self.state.borrow_mut();
        let current = state.rect;
        let (x, y) = if pos.flags.contains(PosFlags::NOMOVE) {
            (current.left, current.top)
        } else {
            (pos.x, pos.y)
        };
        let (w, h) = if pos.flags.contains(PosFlags::NOSIZE) {
            (current.width(), current.height())
        } else {
            (pos.width, pos.height)
        };
        state.rect = Rect::from_origin_size(x, y, w, h);
        Ok(())
    }

    fn monitor_rect(&self) -> PlatformResult<Rect> {
        Ok(self.state.borrow().monitor)
    }

    fn screen_size(&self) -> (i32, i32) {
        self.state.borrow().screen
    }

    fn monitor_dpi(&self) -> Option<u32> {
        self.state.borrow().dpi
    }

    fn resize_content_view(&self, rect: Rect) -> PlatformResult<()> {
        self.record(Call::ResizeContentView(rect));
        Ok(())
    }

    fn child_rect(&self) -> PlatformResult<Option<Rect>> {
        Ok(self.state.borrow().child)
    }

    fn set_child_pos(&self, pos: WindowPos) -> PlatformResult<()> {
        self.record(Call::SetChildPos(pos));
        Ok(())
    }

    fn style(&self) -> u32 {
        self.state.borrow().style
    }

    fn set_style(&self, style: u32) {
        self.record(Call::SetStyle(style));
        self.state.borrow_mut().style = style;
    }

    fn ex_style(&self) -> u32 {
        self.state.borrow().ex_style
    }

    fn set_ex_style(&self, ex_style: u32) {
        self.record(Call::SetExStyle(ex_style));
        self.state.borrow_mut().ex_style = ex_style;
    }

    fn class_style(&self) -> u32 {
        self.state.borrow().class_style
    }

    fn set_class_style(&self, class_style: u32) {
        self.record(Call::SetClassStyle(class_style));
        self.state.borrow_mut().class_style = class_style;
    }

    fn show_state(&self) -> ShowState {
        self.state.borrow().show_state
    }

    fn is_zoomed(&self) -> bool {
        self.state.borrow().show_state == ShowState::Maximized
    }

    fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    fn is_foreground(&self) -> bool {
        self.state.borrow().foreground
    }

    fn sys_command(&self, command: SysCommand, dispatch: Dispatch) -> PlatformResult<()> {
        self.record(Call::SysCommand(command, dispatch));
        let mut state = self.state.borrow_mut();
        match command {
            SysCommand::Maximize => state.show_state = ShowState::Maximized,
            SysCommand::Minimize => state.show_state = ShowState::Minimized,
            SysCommand::Restore => state.show_state = ShowState::Normal,
            _ => {}
        }
        Ok(())
    }

    fn show(&self) {
        self.record(Call::Show);
        self.state.borrow_mut().visible = true;
    }

    fn hide(&self) {
        self.record(Call::Hide);
        self.state.borrow_mut().visible = false;
    }

    fn set_foreground(&self) {
        self.record(Call::SetForeground);
        self.state.borrow_mut().foreground = true;
    }

    fn activate_next_visible(&self) -> bool {
        self.state.borrow_mut().foreground = false;
        true
    }

    fn appbar_new(&self, _callback_message: u32) -> bool {
        self.record(Call::AppBarNew);
        self.state.borrow().appbar_accepts
    }

    fn appbar_remove(&self) {
        self.record(Call::AppBarRemove);
    }

    fn appbar_query_pos(&self, edge: AppBarEdge, rect: Rect) -> Rect {
        self.record(Call::AppBarQueryPos(edge, rect));
        let reserved = self.state.borrow().reserved_left;
        if edge == AppBarEdge::Left && reserved > 0 {
            // Another bar owns the leftmost pixels: the shell shifts and shrinks us.
            Rect::new(reserved, rect.top, rect.right.max(reserved), rect.bottom)
        } else {
            rect
        }
    }

    fn appbar_set_pos(&self, edge: AppBarEdge, rect: Rect) -> Rect {
        self.record(Call::AppBarSetPos(edge, rect));
        rect
    }

    fn title(&self) -> PlatformResult<String> {
        Ok(self.state.borrow().title.clone())
    }

    fn set_title(&self, title: &str) -> PlatformResult<()> {
        self.record(Call::SetTitle(title.to_string()));
        self.state.borrow_mut().title = title.to_string();
        Ok(())
    }

    fn title_bar_height(&self) -> i32 {
        31
    }

    fn extend_frame_into_client_area(&self, margins: Margins) -> PlatformResult<()> {
        self.record(Call::ExtendFrame(margins));
        Ok(())
    }

    fn set_layered_alpha(&self, alpha: u8) -> PlatformResult<()> {
        self.record(Call::SetLayeredAlpha(alpha));
        Ok(())
    }

    fn set_accent_policy(&self, policy: AccentPolicy) -> bool {
        self.record(Call::SetAccentPolicy(policy));
        self.state.borrow().accent_supported
    }

    fn apps_use_light_theme(&self) -> Option<bool> {
        self.state.borrow().light_theme
    }

    fn set_dark_decorations(&self, enabled: bool) -> PlatformResult<()> {
        self.record(Call::SetDarkDecorations(enabled));
        Ok(())
    }

    fn set_icon_from_file(&self, path: &str) -> PlatformResult<()> {
        if path.is_empty() {
            return Err(PlatformError::OperationFailed("empty icon path".into()));
        }
        self.record(Call::SetIcon(path.to_string()));
        Ok(())
    }

    fn acquire_taskbar(&self) -> PlatformResult<()> {
        self.record(Call::AcquireTaskbar);
        Ok(())
    }

    fn set_taskbar_progress(&self, progress: TaskbarProgress) -> PlatformResult<()> {
        self.record(Call::TaskbarProgress(progress));
        Ok(())
    }

    fn set_taskbar_tab(&self, present: bool) -> PlatformResult<()> {
        self.record(Call::TaskbarTab(present));
        Ok(())
    }

    fn release_capture(&self) {
        self.record(Call::ReleaseCapture);
    }

    fn cursor_pos(&self) -> (i32, i32) {
        (400, 300)
    }

    fn post_nc_button_down(&self, hit: HitTest, _at: (i32, i32)) -> PlatformResult<()> {
        self.record(Call::NcButtonDown(hit));
        Ok(())
    }

    fn post_nc_double_click(&self, hit: HitTest, _at: (i32, i32)) -> PlatformResult<()> {
        self.record(Call::NcDoubleClick(hit));
        Ok(())
    }

    fn track_system_menu(&self, _at: (i32, i32)) -> Option<u32> {
        self.state.borrow().menu_choice
    }

    fn post_quit(&self) {
        self.record(Call::PostQuit);
    }
}
