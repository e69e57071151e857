/*
 * Shell integration: the AppBar message protocol and the taskbar button
 * (`ITaskbarList3`) used for progress and tab visibility.
 */
use windows::Win32::{
    Foundation::{HWND, RECT},
    System::Com::{CLSCTX_ALL, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx},
    UI::Shell::{
        ABM_NEW, ABM_QUERYPOS, ABM_REMOVE, ABM_SETPOS, APPBARDATA, ITaskbarList3, SHAppBarMessage,
        TBPF_INDETERMINATE, TBPF_NOPROGRESS, TBPF_NORMAL, TBPFLAG, TaskbarList,
    },
};

use crate::error::Result as PlatformResult;
use crate::types::{AppBarEdge, ProgressState, Rect};

fn appbar_data(hwnd: HWND) -> APPBARDATA {
    APPBARDATA {
        cbSize: std::mem::size_of::<APPBARDATA>() as u32,
        hWnd: hwnd,
        ..Default::default()
    }
}

pub(crate) fn to_win_rect(rect: Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

pub(crate) fn from_win_rect(rect: RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

pub(crate) fn appbar_new(hwnd: HWND, callback_message: u32) -> bool {
    let mut data = appbar_data(hwnd);
    data.uCallbackMessage = callback_message;
    unsafe { SHAppBarMessage(ABM_NEW, &mut data) != 0 }
}

pub(crate) fn appbar_remove(hwnd: HWND) {
    let mut data = appbar_data(hwnd);
    unsafe { SHAppBarMessage(ABM_REMOVE, &mut data) };
}

/// Sends QUERYPOS or SETPOS and returns the rectangle the shell wrote back.
pub(crate) fn appbar_position(
    hwnd: HWND,
    message: AppBarPositionMessage,
    edge: AppBarEdge,
    rect: Rect,
) -> Rect {
    let mut data = appbar_data(hwnd);
    data.uEdge = edge as u32;
    data.rc = to_win_rect(rect);
    let message = match message {
        AppBarPositionMessage::Query => ABM_QUERYPOS,
        AppBarPositionMessage::Set => ABM_SETPOS,
    };
    unsafe { SHAppBarMessage(message, &mut data) };
    from_win_rect(data.rc)
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum AppBarPositionMessage {
    Query,
    Set,
}

/*
 * Creates and initializes the taskbar list. COM is initialized for the
 * calling (UI) thread first; an already-initialized apartment is fine.
 */
pub(crate) fn create_taskbar_list() -> PlatformResult<ITaskbarList3> {
    unsafe {
        let hr = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
        if hr.is_err() {
            log::debug!("Shell: CoInitializeEx returned {hr:?}, continuing with existing apartment.");
        }
        let taskbar: ITaskbarList3 = CoCreateInstance(&TaskbarList, None, CLSCTX_ALL)?;
        taskbar.HrInit()?;
        Ok(taskbar)
    }
}

pub(crate) fn progress_flag(state: ProgressState) -> TBPFLAG {
    match state {
        ProgressState::NoProgress => TBPF_NOPROGRESS,
        ProgressState::Indeterminate => TBPF_INDETERMINATE,
        ProgressState::Normal => TBPF_NORMAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_conversion_keeps_edges() {
        let rect = Rect::new(-10, 0, 250, 1080);
        assert_eq!(from_win_rect(to_win_rect(rect)), rect);
    }

    #[test]
    fn progress_flags_match_taskbar_states() {
        assert_eq!(progress_flag(ProgressState::NoProgress), TBPF_NOPROGRESS);
        assert_eq!(progress_flag(ProgressState::Normal), TBPF_NORMAL);
    }
}
