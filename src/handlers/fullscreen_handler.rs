/*
 * Fullscreen transitions for a top-level window.
 *
 * Entering fullscreen snapshots the window's maximized flag, style bits,
 * frame rectangle and title-bar style, maximizes it, and (for framed windows)
 * strips the overlapped-window chrome and stretches the window over the whole
 * monitor rectangle so taskbar and AppBar areas are covered too. Leaving
 * fullscreen consumes the snapshot and puts the window back exactly where it
 * was.
 *
 * The snapshot is only taken on a Normal -> Fullscreen edge. Repeated
 * requests for the current state do nothing, so a redundant "go fullscreen"
 * can never overwrite the geometry we need to restore.
 */
use super::chrome_handler::ChromeState;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::native::NativeWindow;
use crate::types::{Dispatch, PosFlags, Rect, ShowState, SysCommand, WindowPos, ZOrder, style};

/// Window geometry and chrome captured on entry to fullscreen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FullscreenSnapshot {
    pub(crate) was_maximized: bool,
    pub(crate) previous_style: u32,
    pub(crate) previous_frame: Rect,
    pub(crate) previous_title_bar_style: String,
}

/// Holds a snapshot exactly while the window is fullscreen.
#[derive(Debug, Default)]
pub(crate) struct FullscreenState {
    snapshot: Option<FullscreenSnapshot>,
}

impl FullscreenState {
    pub(crate) fn is_full_screen(&self) -> bool {
        self.snapshot.is_some()
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Option<&FullscreenSnapshot> {
        self.snapshot.as_ref()
    }
}

pub(crate) fn set_full_screen(
    native: &dyn NativeWindow,
    state: &mut FullscreenState,
    chrome: &mut ChromeState,
    is_full_screen: bool,
) -> PlatformResult<()> {
    match (state.is_full_screen(), is_full_screen) {
        (false, true) => enter_full_screen(native, state, chrome),
        (true, false) => exit_full_screen(native, state, chrome),
        (_, requested) => {
            log::trace!("FullscreenHandler: already in requested state (fullscreen: {requested}).");
            Ok(())
        }
    }
}

fn enter_full_screen(
    native: &dyn NativeWindow,
    state: &mut FullscreenState,
    chrome: &ChromeState,
) -> PlatformResult<()> {
    let snapshot = FullscreenSnapshot {
        was_maximized: native.is_zoomed(),
        previous_style: native.style(),
        previous_frame: native.window_rect()?,
        previous_title_bar_style: chrome.title_bar_style().to_string(),
    };
    log::debug!("FullscreenHandler: entering fullscreen from {snapshot:?}.");
    let previous_style = snapshot.previous_style;
    state.snapshot = Some(snapshot);

    native.sys_command(SysCommand::Maximize, Dispatch::Send)?;
    if chrome.is_frameless() {
        return Ok(());
    }

    let monitor = native.monitor_rect()?;
    native.set_style(previous_style & !style::WS_OVERLAPPEDWINDOW);
    native.set_window_pos(WindowPos::to_rect(
        Some(ZOrder::Top),
        monitor,
        PosFlags::NOOWNERZORDER | PosFlags::FRAMECHANGED,
    ))
}

fn exit_full_screen(
    native: &dyn NativeWindow,
    state: &mut FullscreenState,
    chrome: &mut ChromeState,
) -> PlatformResult<()> {
    let snapshot = state.snapshot.take().ok_or_else(|| {
        PlatformError::OperationFailed("fullscreen exit without a snapshot".into())
    })?;
    log::debug!("FullscreenHandler: leaving fullscreen, restoring {snapshot:?}.");

    native.set_style(snapshot.previous_style);
    chrome.set_title_bar_style_value(snapshot.previous_title_bar_style);

    if snapshot.was_maximized {
        // Going back to maximized: no restore in between. The content view
        // misses the usual size notification here, so it is sized by hand.
        native.set_window_pos(WindowPos {
            insert_after: None,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            flags: PosFlags::NOACTIVATE
                | PosFlags::NOMOVE
                | PosFlags::NOSIZE
                | PosFlags::NOZORDER
                | PosFlags::FRAMECHANGED,
        })?;
        let client = native.client_rect()?;
        native.resize_content_view(client)?;
        native.sys_command(SysCommand::Maximize, Dispatch::Post)
    } else {
        if native.show_state() != ShowState::Normal {
            native.sys_command(SysCommand::Restore, Dispatch::Send)?;
        }
        native.set_window_pos(WindowPos::to_rect(
            None,
            snapshot.previous_frame,
            PosFlags::NOACTIVATE | PosFlags::NOZORDER | PosFlags::FRAMECHANGED,
        ))
    }
}
