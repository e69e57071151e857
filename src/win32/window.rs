/*
 * `NativeWindow` over a real top-level HWND. The window is owned by the host
 * (it was created by the embedding framework or a `WindowFactory`); this type
 * only references it and never destroys it.
 */
use std::cell::OnceCell;

use windows::{
    Win32::{
        Foundation::{HWND, LPARAM, POINT, RECT, WPARAM},
        Graphics::Dwm::{DWMWINDOWATTRIBUTE, DwmExtendFrameIntoClientArea, DwmSetWindowAttribute},
        Graphics::Gdi::{GetMonitorInfoW, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow},
        UI::Controls::MARGINS,
        UI::Input::KeyboardAndMouse::ReleaseCapture,
        UI::Shell::ITaskbarList3,
        UI::WindowsAndMessaging::*,
    },
    core::{BOOL, HSTRING, PCWSTR},
};

use super::shell::{self, AppBarPositionMessage};
use super::system;
use crate::config::ManagerConfig;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::native::NativeWindow;
use crate::types::{
    AccentPolicy, AppBarEdge, Dispatch, HitTest, Margins, Rect, ShowState, SysCommand,
    TaskbarProgress, WindowPos, ZOrder,
};

const WM_GETTITLEBARINFOEX: u32 = 0x033F;
const DWMWA_USE_IMMERSIVE_DARK_MODE: DWMWINDOWATTRIBUTE = DWMWINDOWATTRIBUTE(20);
// Pre-20H1 builds used 19 for the same attribute.
const DWMWA_USE_IMMERSIVE_DARK_MODE_LEGACY: DWMWINDOWATTRIBUTE = DWMWINDOWATTRIBUTE(19);
const SMALL_ICON_SIZE: i32 = 16;
const BIG_ICON_SIZE: i32 = 32;

pub struct Win32Window {
    hwnd: HWND,
    content_view_class: HSTRING,
    taskbar: OnceCell<ITaskbarList3>,
}

impl Win32Window {
    /// Wraps a raw window handle as handed over by the host.
    pub fn from_raw(hwnd: isize, config: &ManagerConfig) -> PlatformResult<Self> {
        let hwnd = HWND(hwnd as *mut _);
        if hwnd.is_invalid() || !unsafe { IsWindow(Some(hwnd)) }.as_bool() {
            return Err(PlatformError::InvalidHandle(format!(
                "{hwnd:?} is not a window"
            )));
        }
        Ok(Win32Window {
            hwnd,
            content_view_class: HSTRING::from(config.content_view_class.as_str()),
            taskbar: OnceCell::new(),
        })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    fn taskbar(&self) -> PlatformResult<&ITaskbarList3> {
        self.taskbar.get().ok_or_else(|| {
            PlatformError::InitializationFailed("taskbar list not acquired".into())
        })
    }

    fn first_child(&self) -> Option<HWND> {
        unsafe { GetWindow(self.hwnd, GW_CHILD) }
            .ok()
            .filter(|child| !child.is_invalid())
    }

    fn post(&self, message: u32, wparam: usize, lparam: isize) -> PlatformResult<()> {
        unsafe { PostMessageW(Some(self.hwnd), message, WPARAM(wparam), LPARAM(lparam))? };
        Ok(())
    }
}

fn insert_after_handle(order: ZOrder) -> HWND {
    match order {
        ZOrder::Top => HWND_TOP,
        ZOrder::Bottom => HWND_BOTTOM,
        ZOrder::TopMost => HWND_TOPMOST,
        ZOrder::NoTopMost => HWND_NOTOPMOST,
    }
}

fn sys_command_code(command: SysCommand) -> u32 {
    match command {
        SysCommand::Maximize => SC_MAXIMIZE,
        SysCommand::Minimize => SC_MINIMIZE,
        SysCommand::Restore => SC_RESTORE,
        SysCommand::Close => SC_CLOSE,
        SysCommand::MoveByCaption => SC_MOVE | HTCAPTION,
        SysCommand::Raw(code) => code,
    }
}

// Screen coordinates packed the way MAKELPARAM does.
fn point_lparam((x, y): (i32, i32)) -> isize {
    (((y as u16 as u32) << 16) | (x as u16 as u32)) as i32 as isize
}

// Reads a window's text with injected length/text getters.
fn read_window_text_with<FLen, FGet>(get_len: FLen, get_text: FGet) -> PlatformResult<String>
where
    FLen: Fn() -> i32,
    FGet: Fn(&mut [u16]) -> i32,
{
    let len = get_len();
    if len < 0 {
        return Err(PlatformError::OperationFailed(
            "GetWindowTextLengthW returned negative length".into(),
        ));
    }
    let mut buffer = vec![0u16; len as usize + 1];
    let copied = get_text(&mut buffer);
    if copied < 0 {
        return Err(PlatformError::OperationFailed(
            "GetWindowTextW returned negative length".into(),
        ));
    }
    buffer.truncate(copied as usize);
    Ok(String::from_utf16_lossy(&buffer))
}

impl NativeWindow for Win32Window {
    fn window_rect(&self) -> PlatformResult<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(self.hwnd, &mut rect)? };
        Ok(shell::from_win_rect(rect))
    }

    fn client_rect(&self) -> PlatformResult<Rect> {
        let mut rect = RECT::default();
        unsafe { GetClientRect(self.hwnd, &mut rect)? };
        Ok(shell::from_win_rect(rect))
    }

    fn set_window_pos(&self, pos: WindowPos) -> PlatformResult<()> {
        log::trace!("Win32Window: SetWindowPos {pos:?}");
        unsafe {
            SetWindowPos(
                self.hwnd,
                pos.insert_after.map(insert_after_handle),
                pos.x,
                pos.y,
                pos.width,
                pos.height,
                SET_WINDOW_POS_FLAGS(pos.flags.bits()),
            )?
        };
        Ok(())
    }

    fn monitor_rect(&self) -> PlatformResult<Rect> {
        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        let found = unsafe {
            let monitor = MonitorFromWindow(self.hwnd, MONITOR_DEFAULTTONEAREST);
            GetMonitorInfoW(monitor, &mut info)
        };
        if !found.as_bool() {
            return Err(PlatformError::OperationFailed("GetMonitorInfoW failed".into()));
        }
        Ok(shell::from_win_rect(info.rcMonitor))
    }

    fn screen_size(&self) -> (i32, i32) {
        unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) }
    }

    fn monitor_dpi(&self) -> Option<u32> {
        system::monitor_dpi(self.hwnd)
    }

    fn resize_content_view(&self, rect: Rect) -> PlatformResult<()> {
        let child = unsafe {
            FindWindowExW(
                Some(self.hwnd),
                None,
                &self.content_view_class,
                PCWSTR::null(),
            )
        };
        match child {
            Ok(child) if !child.is_invalid() => {
                unsafe {
                    MoveWindow(child, rect.left, rect.top, rect.width(), rect.height(), true)?
                };
                Ok(())
            }
            _ => {
                log::warn!(
                    "Win32Window: no '{}' child to resize.",
                    self.content_view_class
                );
                Ok(())
            }
        }
    }

    fn child_rect(&self) -> PlatformResult<Option<Rect>> {
        let Some(child) = self.first_child() else {
            return Ok(None);
        };
        let mut rect = RECT::default();
        unsafe { GetWindowRect(child, &mut rect)? };
        Ok(Some(shell::from_win_rect(rect)))
    }

    fn set_child_pos(&self, pos: WindowPos) -> PlatformResult<()> {
        let Some(child) = self.first_child() else {
            return Ok(());
        };
        log::trace!("Win32Window: child SetWindowPos {pos:?}");
        unsafe {
            SetWindowPos(
                child,
                pos.insert_after.map(insert_after_handle),
                pos.x,
                pos.y,
                pos.width,
                pos.height,
                SET_WINDOW_POS_FLAGS(pos.flags.bits()),
            )?
        };
        Ok(())
    }

    fn style(&self) -> u32 {
        unsafe { GetWindowLongW(self.hwnd, GWL_STYLE) as u32 }
    }

    fn set_style(&self, style: u32) {
        unsafe { SetWindowLongW(self.hwnd, GWL_STYLE, style as i32) };
    }

    fn ex_style(&self) -> u32 {
        unsafe { GetWindowLongW(self.hwnd, GWL_EXSTYLE) as u32 }
    }

    fn set_ex_style(&self, ex_style: u32) {
        unsafe { SetWindowLongW(self.hwnd, GWL_EXSTYLE, ex_style as i32) };
    }

    fn class_style(&self) -> u32 {
        unsafe { GetClassLongW(self.hwnd, GCL_STYLE) }
    }

    fn set_class_style(&self, class_style: u32) {
        unsafe { SetClassLongW(self.hwnd, GCL_STYLE, class_style as i32) };
    }

    fn show_state(&self) -> ShowState {
        unsafe {
            if IsIconic(self.hwnd).as_bool() {
                ShowState::Minimized
            } else if IsZoomed(self.hwnd).as_bool() {
                ShowState::Maximized
            } else {
                ShowState::Normal
            }
        }
    }

    fn is_zoomed(&self) -> bool {
        unsafe { IsZoomed(self.hwnd) }.as_bool()
    }

    fn is_visible(&self) -> bool {
        unsafe { IsWindowVisible(self.hwnd) }.as_bool()
    }

    fn is_foreground(&self) -> bool {
        unsafe { GetForegroundWindow() == self.hwnd }
    }

    fn sys_command(&self, command: SysCommand, dispatch: Dispatch) -> PlatformResult<()> {
        let code = sys_command_code(command) as usize;
        match dispatch {
            Dispatch::Send => {
                unsafe {
                    SendMessageW(self.hwnd, WM_SYSCOMMAND, Some(WPARAM(code)), Some(LPARAM(0)))
                };
                Ok(())
            }
            Dispatch::Post => self.post(WM_SYSCOMMAND, code, 0),
        }
    }

    fn show(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOW);
        }
    }

    fn hide(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_HIDE);
        }
    }

    fn set_foreground(&self) {
        unsafe {
            let _ = SetForegroundWindow(self.hwnd);
        }
    }

    fn activate_next_visible(&self) -> bool {
        let mut next = unsafe { GetWindow(self.hwnd, GW_HWNDNEXT) };
        while let Ok(candidate) = next {
            if candidate.is_invalid() {
                break;
            }
            if unsafe { IsWindowVisible(candidate) }.as_bool() {
                unsafe {
                    let _ = SetForegroundWindow(candidate);
                }
                return true;
            }
            next = unsafe { GetWindow(candidate, GW_HWNDNEXT) };
        }
        false
    }

    fn appbar_new(&self, callback_message: u32) -> bool {
        shell::appbar_new(self.hwnd, callback_message)
    }

    fn appbar_remove(&self) {
        shell::appbar_remove(self.hwnd);
    }

    fn appbar_query_pos(&self, edge: AppBarEdge, rect: Rect) -> Rect {
        shell::appbar_position(self.hwnd, AppBarPositionMessage::Query, edge, rect)
    }

    fn appbar_set_pos(&self, edge: AppBarEdge, rect: Rect) -> Rect {
        shell::appbar_position(self.hwnd, AppBarPositionMessage::Set, edge, rect)
    }

    fn title(&self) -> PlatformResult<String> {
        read_window_text_with(
            || unsafe { GetWindowTextLengthW(self.hwnd) },
            |buf| unsafe { GetWindowTextW(self.hwnd, buf) },
        )
    }

    fn set_title(&self, title: &str) -> PlatformResult<()> {
        unsafe { SetWindowTextW(self.hwnd, &HSTRING::from(title))? };
        Ok(())
    }

    fn title_bar_height(&self) -> i32 {
        let mut info = TITLEBARINFOEX {
            cbSize: std::mem::size_of::<TITLEBARINFOEX>() as u32,
            ..Default::default()
        };
        unsafe {
            SendMessageW(
                self.hwnd,
                WM_GETTITLEBARINFOEX,
                Some(WPARAM(0)),
                Some(LPARAM(&mut info as *mut TITLEBARINFOEX as isize)),
            )
        };
        (info.rcTitleBar.bottom - info.rcTitleBar.top).max(0)
    }

    fn extend_frame_into_client_area(&self, margins: Margins) -> PlatformResult<()> {
        let margins = MARGINS {
            cxLeftWidth: margins.left,
            cxRightWidth: margins.right,
            cyTopHeight: margins.top,
            cyBottomHeight: margins.bottom,
        };
        unsafe { DwmExtendFrameIntoClientArea(self.hwnd, &margins)? };
        Ok(())
    }

    fn set_layered_alpha(&self, alpha: u8) -> PlatformResult<()> {
        unsafe {
            SetLayeredWindowAttributes(
                self.hwnd,
                windows::Win32::Foundation::COLORREF(0),
                alpha,
                LWA_ALPHA,
            )?
        };
        Ok(())
    }

    fn set_accent_policy(&self, policy: AccentPolicy) -> bool {
        system::set_accent_policy(self.hwnd, policy)
    }

    fn apps_use_light_theme(&self) -> Option<bool> {
        system::apps_use_light_theme()
    }

    fn set_dark_decorations(&self, enabled: bool) -> PlatformResult<()> {
        let value = BOOL::from(enabled);
        let set = |attribute: DWMWINDOWATTRIBUTE| unsafe {
            DwmSetWindowAttribute(
                self.hwnd,
                attribute,
                &value as *const BOOL as *const _,
                std::mem::size_of::<BOOL>() as u32,
            )
        };
        if set(DWMWA_USE_IMMERSIVE_DARK_MODE).is_err() {
            set(DWMWA_USE_IMMERSIVE_DARK_MODE_LEGACY)?;
        }
        Ok(())
    }

    fn set_icon_from_file(&self, path: &str) -> PlatformResult<()> {
        let path = HSTRING::from(path);
        for (size, which) in [(SMALL_ICON_SIZE, ICON_SMALL), (BIG_ICON_SIZE, ICON_BIG)] {
            let icon =
                unsafe { LoadImageW(None, &path, IMAGE_ICON, size, size, LR_LOADFROMFILE)? };
            unsafe {
                SendMessageW(
                    self.hwnd,
                    WM_SETICON,
                    Some(WPARAM(which as usize)),
                    Some(LPARAM(icon.0 as isize)),
                )
            };
        }
        Ok(())
    }

    fn acquire_taskbar(&self) -> PlatformResult<()> {
        if self.taskbar.get().is_some() {
            return Ok(());
        }
        let taskbar = shell::create_taskbar_list()?;
        let _ = self.taskbar.set(taskbar);
        log::debug!("Win32Window: taskbar list acquired for {:?}.", self.hwnd);
        Ok(())
    }

    fn set_taskbar_progress(&self, progress: TaskbarProgress) -> PlatformResult<()> {
        let taskbar = self.taskbar()?;
        unsafe {
            taskbar.SetProgressState(self.hwnd, shell::progress_flag(progress.state))?;
            taskbar.SetProgressValue(self.hwnd, progress.completed, progress.total)?;
        }
        Ok(())
    }

    fn set_taskbar_tab(&self, present: bool) -> PlatformResult<()> {
        let taskbar = self.taskbar()?;
        unsafe {
            if present {
                taskbar.AddTab(self.hwnd)?;
            } else {
                taskbar.DeleteTab(self.hwnd)?;
            }
        }
        Ok(())
    }

    fn release_capture(&self) {
        unsafe {
            let _ = ReleaseCapture();
        }
    }

    fn cursor_pos(&self) -> (i32, i32) {
        let mut point = POINT::default();
        if unsafe { GetCursorPos(&mut point) }.is_err() {
            log::warn!("Win32Window: GetCursorPos failed.");
        }
        (point.x, point.y)
    }

    fn post_nc_button_down(&self, hit: HitTest, at: (i32, i32)) -> PlatformResult<()> {
        self.post(WM_NCLBUTTONDOWN, hit as usize, point_lparam(at))
    }

    fn post_nc_double_click(&self, hit: HitTest, at: (i32, i32)) -> PlatformResult<()> {
        self.post(WM_NCLBUTTONDBLCLK, hit as usize, point_lparam(at))
    }

    fn track_system_menu(&self, (x, y): (i32, i32)) -> Option<u32> {
        let command = unsafe {
            let menu = GetSystemMenu(self.hwnd, false);
            TrackPopupMenu(
                menu,
                TPM_LEFTBUTTON | TPM_RIGHTBUTTON | TPM_RETURNCMD | TPM_TOPALIGN | TPM_LEFTALIGN,
                x,
                y,
                Some(0),
                self.hwnd,
                None,
            )
        };
        u32::try_from(command.0).ok().filter(|command| *command != 0)
    }

    fn post_quit(&self) {
        unsafe { PostQuitMessage(0) };
    }
}
