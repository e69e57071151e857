use crate::error::Result as PlatformResult;
use crate::native::NativeWindow;
use crate::types::{ProgressState, TaskbarProgress};

const PROGRESS_TOTAL: u64 = 100;

#[derive(Debug, Default)]
pub(crate) struct TaskbarState {
    skip_taskbar: bool,
}

impl TaskbarState {
    pub(crate) fn is_skip_taskbar(&self) -> bool {
        self.skip_taskbar
    }
}

/*
 * Maps a host progress fraction to the taskbar button state. Below zero
 * clears the indicator and above one shows a full indeterminate bar.
 *
 * Anything in [0, 1] is a determinate percentage in the Normal state, not
 * Indeterminate, so the value stays visible on the button.
 */
pub(crate) fn taskbar_progress_for(progress: f64) -> TaskbarProgress {
    if progress < 0.0 {
        TaskbarProgress {
            state: ProgressState::NoProgress,
            completed: 0,
            total: 0,
        }
    } else if progress > 1.0 {
        TaskbarProgress {
            state: ProgressState::Indeterminate,
            completed: PROGRESS_TOTAL,
            total: PROGRESS_TOTAL,
        }
    } else {
        TaskbarProgress {
            state: ProgressState::Normal,
            completed: (progress * PROGRESS_TOTAL as f64) as u64,
            total: PROGRESS_TOTAL,
        }
    }
}

pub(crate) fn handle_set_progress_bar(
    native: &dyn NativeWindow,
    progress: f64,
) -> PlatformResult<()> {
    if progress.is_nan() {
        log::warn!("ProgressHandler: NaN progress ignored.");
        return Ok(());
    }
    let mapped = taskbar_progress_for(progress);
    log::trace!("ProgressHandler: progress {progress} -> {mapped:?}");
    native.acquire_taskbar()?;
    native.set_taskbar_progress(mapped)
}

pub(crate) fn handle_set_skip_taskbar(
    native: &dyn NativeWindow,
    state: &mut TaskbarState,
    skip: bool,
) -> PlatformResult<()> {
    native.acquire_taskbar()?;
    native.set_taskbar_tab(!skip)?;
    state.skip_taskbar = skip;
    Ok(())
}
