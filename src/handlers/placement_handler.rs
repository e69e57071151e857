/*
 * Placement of a top-level window: bounds in logical pixels, size
 * constraints, maximize/minimize/restore, z-order, the style bits behind the
 * resizable/minimizable/maximizable/closable toggles, and the system-driven
 * drag and resize loops.
 *
 * Maximize, minimize and restore only post a command when the window is not
 * already in the target state. Drag and resize first drop any AppBar
 * registration: a docked bar's position is owned by the shell.
 */
use super::appbar_handler::{self, AppBarState};
use super::fullscreen_handler::FullscreenState;
use crate::error::Result as PlatformResult;
use crate::native::NativeWindow;
use crate::types::{
    Bounds, Dispatch, HitTest, PosFlags, ShowState, SysCommand, WindowPos, ZOrder, style,
};

/// A size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug)]
pub(crate) struct PlacementState {
    is_resizable: bool,
    is_always_on_bottom: bool,
    aspect_ratio: f64,
    minimum_size: Option<LogicalSize>,
    maximum_size: Option<LogicalSize>,
    pixel_ratio: f64,
}

impl Default for PlacementState {
    fn default() -> Self {
        PlacementState {
            is_resizable: true,
            is_always_on_bottom: false,
            aspect_ratio: 0.0,
            minimum_size: None,
            maximum_size: None,
            pixel_ratio: 1.0,
        }
    }
}

impl PlacementState {
    pub(crate) fn is_resizable(&self) -> bool {
        self.is_resizable
    }

    pub(crate) fn is_always_on_bottom(&self) -> bool {
        self.is_always_on_bottom
    }

    pub(crate) fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub(crate) fn set_aspect_ratio(&mut self, aspect_ratio: f64) {
        self.aspect_ratio = aspect_ratio;
    }

    pub(crate) fn minimum_size(&self) -> Option<LogicalSize> {
        self.minimum_size
    }

    pub(crate) fn maximum_size(&self) -> Option<LogicalSize> {
        self.maximum_size
    }

    pub(crate) fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

/// Physical-pixel limits the host applies while the user sizes the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSizeLimits {
    pub minimum: Option<(i32, i32)>,
    pub maximum: Option<(i32, i32)>,
    /// Width / height ratio to keep while sizing, `None` when unconstrained.
    pub aspect_ratio: Option<f64>,
}

pub(crate) fn track_size_limits(state: &PlacementState) -> TrackSizeLimits {
    let to_physical = |size: LogicalSize| {
        (
            (size.width * state.pixel_ratio()) as i32,
            (size.height * state.pixel_ratio()) as i32,
        )
    };
    TrackSizeLimits {
        minimum: state.minimum_size().map(to_physical),
        maximum: state.maximum_size().map(to_physical),
        aspect_ratio: Some(state.aspect_ratio()).filter(|ratio| *ratio > 0.0),
    }
}

/// A parsed `setBounds` request. Omitted coordinates leave that axis alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsRequest {
    pub device_pixel_ratio: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeConstraint {
    Minimum,
    Maximum,
}

pub(crate) fn get_bounds(
    native: &dyn NativeWindow,
    device_pixel_ratio: f64,
) -> PlatformResult<Bounds> {
    let rect = native.window_rect()?;
    Ok(Bounds::from_rect(rect, device_pixel_ratio))
}

/*
 * Position is applied only when both x and y are present, size only when both
 * width and height are. A request with neither changes nothing.
 */
pub(crate) fn set_bounds(native: &dyn NativeWindow, request: BoundsRequest) -> PlatformResult<()> {
    let ratio = request.device_pixel_ratio;
    let position = request.x.zip(request.y);
    let size = request.width.zip(request.height);

    let mut flags = PosFlags::NONE;
    let (x, y) = match position {
        Some((x, y)) => ((x * ratio) as i32, (y * ratio) as i32),
        None => {
            flags |= PosFlags::NOMOVE;
            (0, 0)
        }
    };
    let (width, height) = match size {
        Some((w, h)) => ((w * ratio) as i32, (h * ratio) as i32),
        None => {
            flags |= PosFlags::NOSIZE;
            (0, 0)
        }
    };

    if position.is_none() && size.is_none() {
        log::trace!("PlacementHandler: setBounds without position or size, nothing to do.");
        return Ok(());
    }

    native.set_window_pos(WindowPos {
        insert_after: Some(ZOrder::Top),
        x,
        y,
        width,
        height,
        flags,
    })
}

/// Negative sizes are ignored, as is a non-positive pixel ratio.
pub(crate) fn set_size_constraint(
    state: &mut PlacementState,
    constraint: SizeConstraint,
    device_pixel_ratio: f64,
    size: LogicalSize,
) {
    if size.width < 0.0 || size.height < 0.0 || device_pixel_ratio <= 0.0 {
        log::debug!("PlacementHandler: ignoring {constraint:?} size {size:?}.");
        return;
    }
    state.pixel_ratio = device_pixel_ratio;
    match constraint {
        SizeConstraint::Minimum => state.minimum_size = Some(size),
        SizeConstraint::Maximum => state.maximum_size = Some(size),
    }
}

pub(crate) fn is_maximized(native: &dyn NativeWindow) -> bool {
    native.show_state() == ShowState::Maximized
}

pub(crate) fn is_minimized(native: &dyn NativeWindow) -> bool {
    native.show_state() == ShowState::Minimized
}

/*
 * `vertically` stretches the window to the work-area height the way a
 * double click on the top resize border does.
 */
pub(crate) fn maximize(native: &dyn NativeWindow, vertically: bool) -> PlatformResult<()> {
    if vertically {
        return native.post_nc_double_click(HitTest::Top, native.cursor_pos());
    }
    if is_maximized(native) {
        return Ok(());
    }
    native.sys_command(SysCommand::Maximize, Dispatch::Post)
}

pub(crate) fn restore(native: &dyn NativeWindow) -> PlatformResult<()> {
    if native.show_state() == ShowState::Normal {
        return Ok(());
    }
    native.sys_command(SysCommand::Restore, Dispatch::Post)
}

/// Fullscreen windows ignore minimize requests.
pub(crate) fn minimize(
    native: &dyn NativeWindow,
    fullscreen: &FullscreenState,
) -> PlatformResult<()> {
    if fullscreen.is_full_screen() {
        log::debug!("PlacementHandler: minimize ignored while fullscreen.");
        return Ok(());
    }
    if is_minimized(native) {
        return Ok(());
    }
    native.sys_command(SysCommand::Minimize, Dispatch::Post)
}

pub(crate) fn set_resizable(native: &dyn NativeWindow, state: &mut PlacementState, resizable: bool) {
    state.is_resizable = resizable;
    native.set_style(style::with(native.style(), style::WS_THICKFRAME, resizable));
}

pub(crate) fn is_minimizable(native: &dyn NativeWindow) -> bool {
    native.style() & style::WS_MINIMIZEBOX != 0
}

pub(crate) fn set_minimizable(native: &dyn NativeWindow, minimizable: bool) {
    native.set_style(style::with(native.style(), style::WS_MINIMIZEBOX, minimizable));
}

pub(crate) fn is_maximizable(native: &dyn NativeWindow) -> bool {
    native.style() & style::WS_MAXIMIZEBOX != 0
}

pub(crate) fn set_maximizable(native: &dyn NativeWindow, maximizable: bool) {
    native.set_style(style::with(native.style(), style::WS_MAXIMIZEBOX, maximizable));
}

pub(crate) fn is_closable(native: &dyn NativeWindow) -> bool {
    native.class_style() & style::CS_NOCLOSE == 0
}

pub(crate) fn set_closable(native: &dyn NativeWindow, closable: bool) {
    native.set_class_style(style::with(
        native.class_style(),
        style::CS_NOCLOSE,
        !closable,
    ));
}

pub(crate) fn is_always_on_top(native: &dyn NativeWindow) -> bool {
    native.ex_style() & style::WS_EX_TOPMOST != 0
}

pub(crate) fn set_always_on_top(native: &dyn NativeWindow, on_top: bool) -> PlatformResult<()> {
    let order = if on_top {
        ZOrder::TopMost
    } else {
        ZOrder::NoTopMost
    };
    native.set_window_pos(WindowPos::z_order(order))
}

pub(crate) fn set_always_on_bottom(
    native: &dyn NativeWindow,
    state: &mut PlacementState,
    on_bottom: bool,
) -> PlatformResult<()> {
    state.is_always_on_bottom = on_bottom;
    let order = if on_bottom {
        ZOrder::Bottom
    } else {
        ZOrder::NoTopMost
    };
    native.set_window_pos(WindowPos::z_order(order))
}

pub(crate) fn start_dragging(
    native: &dyn NativeWindow,
    appbar: &mut AppBarState,
) -> PlatformResult<()> {
    appbar_handler::undock(native, appbar);
    native.release_capture();
    native.sys_command(SysCommand::MoveByCaption, Dispatch::Send)
}

pub(crate) fn start_resizing(
    native: &dyn NativeWindow,
    appbar: &mut AppBarState,
    hit: HitTest,
) -> PlatformResult<()> {
    appbar_handler::undock(native, appbar);
    native.release_capture();
    native.post_nc_button_down(hit, native.cursor_pos())
}

/// Shows the system menu at the cursor and forwards the chosen command.
pub(crate) fn pop_up_window_menu(native: &dyn NativeWindow) -> PlatformResult<()> {
    match native.track_system_menu(native.cursor_pos()) {
        Some(command) => native.sys_command(SysCommand::Raw(command), Dispatch::Post),
        None => Ok(()),
    }
}
