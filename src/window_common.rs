/*
 * Per-window state shared by the handlers, plus the small visibility, focus
 * and lifetime helpers that need nothing beyond the native window itself.
 *
 * `NativeWindowData` owns the backend for one window together with every
 * piece of state the OS can't be asked for: AppBar registration and docked
 * edge, the fullscreen snapshot, chrome flags and placement bookkeeping. All
 * of it lives exactly as long as the window's registry entry, so two windows
 * can never see each other's fullscreen geometry.
 */
use crate::handlers::{
    appbar_handler::AppBarState, chrome_handler::ChromeState,
    fullscreen_handler::FullscreenState, placement_handler::PlacementState,
    progress_handler::TaskbarState,
};
use crate::error::Result as PlatformResult;
use crate::native::NativeWindow;
use crate::types::{Dispatch, ShowState, SysCommand, WindowId, WindowPos, ZOrder, style};

pub(crate) struct NativeWindowData {
    logical_window_id: WindowId,
    native: Box<dyn NativeWindow>,
    appbar: AppBarState,
    fullscreen: FullscreenState,
    chrome: ChromeState,
    placement: PlacementState,
    taskbar: TaskbarState,
    prevent_close: bool,
}

impl std::fmt::Debug for NativeWindowData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeWindowData")
            .field("logical_window_id", &self.logical_window_id)
            .field("appbar", &self.appbar)
            .field("fullscreen", &self.fullscreen)
            .field("chrome", &self.chrome)
            .field("placement", &self.placement)
            .field("taskbar", &self.taskbar)
            .field("prevent_close", &self.prevent_close)
            .finish_non_exhaustive()
    }
}

impl NativeWindowData {
    pub(crate) fn new(logical_window_id: WindowId, native: Box<dyn NativeWindow>) -> Self {
        Self {
            logical_window_id,
            native,
            appbar: AppBarState::default(),
            fullscreen: FullscreenState::default(),
            chrome: ChromeState::default(),
            placement: PlacementState::default(),
            taskbar: TaskbarState::default(),
            prevent_close: false,
        }
    }

    pub(crate) fn window_id(&self) -> WindowId {
        self.logical_window_id
    }

    pub(crate) fn native(&self) -> &dyn NativeWindow {
        self.native.as_ref()
    }

    pub(crate) fn appbar(&self) -> &AppBarState {
        &self.appbar
    }

    pub(crate) fn fullscreen(&self) -> &FullscreenState {
        &self.fullscreen
    }

    pub(crate) fn chrome(&self) -> &ChromeState {
        &self.chrome
    }

    pub(crate) fn placement(&self) -> &PlacementState {
        &self.placement
    }

    pub(crate) fn taskbar(&self) -> &TaskbarState {
        &self.taskbar
    }

    // The accessors below split the borrow so a handler can drive the OS
    // while updating the state it owns.

    pub(crate) fn appbar_mut(&mut self) -> (&dyn NativeWindow, &mut AppBarState) {
        (self.native.as_ref(), &mut self.appbar)
    }

    pub(crate) fn fullscreen_mut(
        &mut self,
    ) -> (&dyn NativeWindow, &mut FullscreenState, &mut ChromeState) {
        (
            self.native.as_ref(),
            &mut self.fullscreen,
            &mut self.chrome,
        )
    }

    pub(crate) fn chrome_mut(&mut self) -> (&dyn NativeWindow, &mut ChromeState) {
        (self.native.as_ref(), &mut self.chrome)
    }

    pub(crate) fn placement_mut(&mut self) -> (&dyn NativeWindow, &mut PlacementState) {
        (self.native.as_ref(), &mut self.placement)
    }

    pub(crate) fn taskbar_mut(&mut self) -> (&dyn NativeWindow, &mut TaskbarState) {
        (self.native.as_ref(), &mut self.taskbar)
    }

    pub(crate) fn is_prevent_close(&self) -> bool {
        self.prevent_close
    }

    pub(crate) fn set_prevent_close(&mut self, prevent_close: bool) {
        self.prevent_close = prevent_close;
    }
}

/*
 * Shows the window, raising it first if its style says it is hidden, and
 * gives it the foreground.
 */
pub(crate) fn show_window(native: &dyn NativeWindow) -> PlatformResult<()> {
    if native.style() & style::WS_VISIBLE == 0 {
        native.set_style(native.style() | style::WS_VISIBLE);
        native.set_window_pos(WindowPos::z_order(ZOrder::Top))?;
    }
    native.show();
    native.set_foreground();
    Ok(())
}

pub(crate) fn hide_window(native: &dyn NativeWindow) {
    native.hide();
}

pub(crate) fn focus_window(native: &dyn NativeWindow) -> PlatformResult<()> {
    if native.show_state() == ShowState::Minimized {
        native.sys_command(SysCommand::Restore, Dispatch::Post)?;
    }
    native.set_window_pos(WindowPos::z_order(ZOrder::Top))?;
    native.set_foreground();
    Ok(())
}

/// Hands focus to the next visible window below this one.
pub(crate) fn blur_window(native: &dyn NativeWindow) {
    if !native.activate_next_visible() {
        log::debug!("WindowCommon: blur found no other visible window.");
    }
}

pub(crate) fn set_window_title(native: &dyn NativeWindow, title: &str) -> PlatformResult<()> {
    log::debug!("WindowCommon: setting title to '{title}'");
    native.set_title(title)
}

/// Asks the window to close; the host may still veto it when prevent-close is set.
pub(crate) fn send_close_message(native: &dyn NativeWindow) -> PlatformResult<()> {
    native.sys_command(SysCommand::Close, Dispatch::Post)
}

pub(crate) fn destroy_application(native: &dyn NativeWindow) {
    log::debug!("WindowCommon: posting quit.");
    native.post_quit();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeWindow};

    #[test]
    fn show_restores_visible_style_and_raises() {
        let fake = FakeWindow::with_state(|s| {
            s.style = style::WS_OVERLAPPEDWINDOW;
            s.visible = false;
        });
        show_window(&fake).unwrap();
        assert!(fake.state().visible);
        assert_ne!(fake.state().style & style::WS_VISIBLE, 0);
        assert_eq!(
            fake.calls(),
            vec![
                Call::SetStyle(style::WS_OVERLAPPEDWINDOW | style::WS_VISIBLE),
                Call::SetWindowPos(WindowPos::z_order(ZOrder::Top)),
                Call::Show,
                Call::SetForeground,
            ]
        );
    }

    #[test]
    fn focus_restores_minimized_window() {
        let fake = FakeWindow::with_state(|s| s.show_state = ShowState::Minimized);
        focus_window(&fake).unwrap();
        assert_eq!(fake.state().show_state, ShowState::Normal);
        assert!(fake.calls().contains(&Call::SetForeground));
    }

    #[test]
    fn window_data_starts_undocked_and_windowed() {
        let data = NativeWindowData::new(WindowId::new(4), Box::new(FakeWindow::new()));
        assert_eq!(data.window_id(), WindowId::new(4));
        assert!(!data.appbar().is_registered());
        assert!(!data.fullscreen().is_full_screen());
        assert!(!data.chrome().is_frameless());
        assert!(data.placement().is_resizable());
        assert!(!data.taskbar().is_skip_taskbar());
        assert!(!data.is_prevent_close());
    }

    #[test]
    fn fullscreen_state_is_per_window() {
        let first = FakeWindow::with_state(|s| s.rect = crate::types::Rect::new(0, 0, 300, 200));
        let second = FakeWindow::new();
        let mut a = NativeWindowData::new(WindowId::new(1), Box::new(first.clone()));
        let b = NativeWindowData::new(WindowId::new(2), Box::new(second));

        let (native, fullscreen, chrome) = a.fullscreen_mut();
        crate::handlers::fullscreen_handler::set_full_screen(native, fullscreen, chrome, true)
            .unwrap();

        assert!(a.fullscreen().is_full_screen());
        assert!(!b.fullscreen().is_full_screen());
    }
}
