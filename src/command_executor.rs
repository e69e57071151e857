/*
 * Executes typed `WindowCommand`s against one window's `NativeWindowData`.
 * Stateful work (docking, fullscreen, chrome and placement bookkeeping) is
 * delegated to the handlers in `super::handlers`; this module only picks the
 * handler, logs, and shapes the reply value the host receives.
 */
use serde_json::Value;

use crate::commands::WindowCommand;
use crate::config::ManagerConfig;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::handlers::appbar_handler::{self, DockRequest};
use crate::handlers::placement_handler::{self, BoundsRequest, LogicalSize, SizeConstraint};
use crate::handlers::{chrome_handler, fullscreen_handler, progress_handler};
use crate::window_common::{self, NativeWindowData};

pub(crate) fn execute_command(
    data: &mut NativeWindowData,
    config: &ManagerConfig,
    command: WindowCommand,
) -> PlatformResult<Value> {
    let native = data.native();
    match command {
        WindowCommand::Show => window_common::show_window(native).map(unit),
        WindowCommand::Hide => {
            window_common::hide_window(native);
            Ok(Value::Null)
        }
        WindowCommand::IsVisible => Ok(Value::Bool(native.is_visible())),
        WindowCommand::Focus => window_common::focus_window(native).map(unit),
        WindowCommand::Blur => {
            window_common::blur_window(native);
            Ok(Value::Null)
        }
        WindowCommand::IsFocused => Ok(Value::Bool(native.is_foreground())),

        WindowCommand::IsMaximized => Ok(Value::Bool(placement_handler::is_maximized(native))),
        WindowCommand::Maximize { vertically } => {
            placement_handler::maximize(native, vertically).map(unit)
        }
        WindowCommand::Unmaximize | WindowCommand::Restore => {
            placement_handler::restore(native).map(unit)
        }
        WindowCommand::IsMinimized => Ok(Value::Bool(placement_handler::is_minimized(native))),
        WindowCommand::Minimize => {
            placement_handler::minimize(native, data.fullscreen()).map(unit)
        }

        WindowCommand::IsFullScreen => Ok(Value::Bool(data.fullscreen().is_full_screen())),
        WindowCommand::SetFullScreen { is_full_screen } => {
            execute_set_full_screen(data, is_full_screen)
        }

        WindowCommand::IsDockable => Ok(Value::Bool(true)),
        WindowCommand::IsDocked => Ok(Value::from(data.appbar().dock_state().wire_value())),
        WindowCommand::Dock(request) => execute_dock(data, config, request),
        WindowCommand::Undock => execute_undock(data),

        WindowCommand::SetAspectRatio { aspect_ratio } => {
            let (_, placement) = data.placement_mut();
            placement.set_aspect_ratio(aspect_ratio);
            Ok(Value::Null)
        }
        WindowCommand::SetBackgroundColor(policy) => {
            chrome_handler::set_background_color(native, policy);
            Ok(Value::Null)
        }
        WindowCommand::GetBounds { device_pixel_ratio } => {
            execute_get_bounds(data, device_pixel_ratio)
        }
        WindowCommand::SetBounds(request) => execute_set_bounds(data, request),
        WindowCommand::SetSizeConstraint {
            constraint,
            device_pixel_ratio,
            size,
        } => execute_set_size_constraint(data, constraint, device_pixel_ratio, size),

        WindowCommand::IsResizable => Ok(Value::Bool(data.placement().is_resizable())),
        WindowCommand::SetResizable { is_resizable } => {
            let (native, placement) = data.placement_mut();
            placement_handler::set_resizable(native, placement, is_resizable);
            Ok(Value::Null)
        }
        WindowCommand::IsMinimizable => Ok(Value::Bool(placement_handler::is_minimizable(native))),
        WindowCommand::SetMinimizable { is_minimizable } => {
            placement_handler::set_minimizable(native, is_minimizable);
            Ok(Value::Null)
        }
        WindowCommand::IsMaximizable => Ok(Value::Bool(placement_handler::is_maximizable(native))),
        WindowCommand::SetMaximizable { is_maximizable } => {
            placement_handler::set_maximizable(native, is_maximizable);
            Ok(Value::Null)
        }
        WindowCommand::IsClosable => Ok(Value::Bool(placement_handler::is_closable(native))),
        WindowCommand::SetClosable { is_closable } => {
            placement_handler::set_closable(native, is_closable);
            Ok(Value::Null)
        }
        WindowCommand::IsAlwaysOnTop => Ok(Value::Bool(placement_handler::is_always_on_top(native))),
        WindowCommand::SetAlwaysOnTop { is_always_on_top } => {
            placement_handler::set_always_on_top(native, is_always_on_top).map(unit)
        }
        WindowCommand::IsAlwaysOnBottom => Ok(Value::Bool(data.placement().is_always_on_bottom())),
        WindowCommand::SetAlwaysOnBottom {
            is_always_on_bottom,
        } => {
            let (native, placement) = data.placement_mut();
            placement_handler::set_always_on_bottom(native, placement, is_always_on_bottom)
                .map(unit)
        }

        WindowCommand::GetTitle => native.title().map(Value::String),
        WindowCommand::SetTitle { title } => {
            window_common::set_window_title(native, &title).map(unit)
        }
        WindowCommand::SetTitleBarStyle { title_bar_style } => {
            let (native, chrome) = data.chrome_mut();
            chrome_handler::set_title_bar_style(native, chrome, title_bar_style).map(unit)
        }
        WindowCommand::GetTitleBarHeight => Ok(Value::from(native.title_bar_height())),
        WindowCommand::SetAsFrameless => {
            let (native, chrome) = data.chrome_mut();
            chrome_handler::set_as_frameless(native, chrome).map(unit)
        }
        WindowCommand::HasShadow => Ok(Value::Bool(data.chrome().has_shadow())),
        WindowCommand::SetHasShadow { has_shadow } => {
            let (native, chrome) = data.chrome_mut();
            chrome_handler::set_has_shadow(native, chrome, has_shadow).map(unit)
        }
        WindowCommand::GetOpacity => Ok(Value::from(data.chrome().opacity())),
        WindowCommand::SetOpacity { opacity } => {
            let (native, chrome) = data.chrome_mut();
            chrome_handler::set_opacity(native, chrome, opacity).map(unit)
        }
        WindowCommand::SetBrightness(brightness) => {
            chrome_handler::set_brightness(native, brightness).map(unit)
        }
        WindowCommand::SetIcon { icon_path } => {
            chrome_handler::set_icon(native, &icon_path).map(unit)
        }
        WindowCommand::SetIgnoreMouseEvents { ignore } => {
            chrome_handler::set_ignore_mouse_events(native, ignore);
            Ok(Value::Null)
        }

        WindowCommand::IsSkipTaskbar => Ok(Value::Bool(data.taskbar().is_skip_taskbar())),
        WindowCommand::SetSkipTaskbar { is_skip_taskbar } => {
            let (native, taskbar) = data.taskbar_mut();
            progress_handler::handle_set_skip_taskbar(native, taskbar, is_skip_taskbar).map(unit)
        }
        WindowCommand::SetProgressBar { progress } => {
            progress_handler::handle_set_progress_bar(native, progress).map(unit)
        }
        WindowCommand::WaitUntilReadyToShow => native.acquire_taskbar().map(unit),

        WindowCommand::PopUpWindowMenu => placement_handler::pop_up_window_menu(native).map(unit),
        WindowCommand::StartDragging => {
            let (native, appbar) = data.appbar_mut();
            placement_handler::start_dragging(native, appbar).map(unit)
        }
        WindowCommand::StartResizing(hit) => {
            let (native, appbar) = data.appbar_mut();
            placement_handler::start_resizing(native, appbar, hit).map(unit)
        }

        WindowCommand::IsPreventClose => Ok(Value::Bool(data.is_prevent_close())),
        WindowCommand::SetPreventClose { is_prevent_close } => {
            data.set_prevent_close(is_prevent_close);
            Ok(Value::Null)
        }
        WindowCommand::Close => window_common::send_close_message(native).map(unit),
        WindowCommand::Destroy => {
            window_common::destroy_application(native);
            Ok(Value::Null)
        }
        WindowCommand::ForceRefresh => chrome_handler::force_refresh(native).map(unit),
        WindowCommand::ForceChildRefresh => chrome_handler::force_child_refresh(native).map(unit),
    }
}

fn unit(_: ()) -> Value {
    Value::Null
}

/*
 * Executes the `dock` command. Replies `false` when the shell refuses the
 * AppBar registration; the window then stays undocked.
 */
pub(crate) fn execute_dock(
    data: &mut NativeWindowData,
    config: &ManagerConfig,
    request: DockRequest,
) -> PlatformResult<Value> {
    log::debug!(
        "CommandExecutor: dock {:?} for WinID {:?}.",
        request,
        data.window_id()
    );
    let (native, appbar) = data.appbar_mut();
    let docked = appbar_handler::dock(native, appbar, config, request)?;
    Ok(Value::Bool(docked))
}

pub(crate) fn execute_undock(data: &mut NativeWindowData) -> PlatformResult<Value> {
    log::debug!("CommandExecutor: undock for WinID {:?}.", data.window_id());
    let (native, appbar) = data.appbar_mut();
    Ok(Value::Bool(appbar_handler::undock(native, appbar)))
}

pub(crate) fn execute_set_full_screen(
    data: &mut NativeWindowData,
    is_full_screen: bool,
) -> PlatformResult<Value> {
    log::debug!(
        "CommandExecutor: setFullScreen({is_full_screen}) for WinID {:?}.",
        data.window_id()
    );
    let (native, fullscreen, chrome) = data.fullscreen_mut();
    fullscreen_handler::set_full_screen(native, fullscreen, chrome, is_full_screen)?;
    Ok(Value::Null)
}

pub(crate) fn execute_get_bounds(
    data: &NativeWindowData,
    device_pixel_ratio: f64,
) -> PlatformResult<Value> {
    let bounds = placement_handler::get_bounds(data.native(), device_pixel_ratio)?;
    log::trace!(
        "CommandExecutor: bounds for WinID {:?} at ratio {device_pixel_ratio}: {bounds:?}",
        data.window_id()
    );
    serde_json::to_value(bounds).map_err(|err| PlatformError::OperationFailed(err.to_string()))
}

pub(crate) fn execute_set_bounds(
    data: &NativeWindowData,
    request: BoundsRequest,
) -> PlatformResult<Value> {
    log::debug!(
        "CommandExecutor: setBounds {request:?} for WinID {:?}.",
        data.window_id()
    );
    placement_handler::set_bounds(data.native(), request)?;
    Ok(Value::Null)
}

pub(crate) fn execute_set_size_constraint(
    data: &mut NativeWindowData,
    constraint: SizeConstraint,
    device_pixel_ratio: f64,
    size: LogicalSize,
) -> PlatformResult<Value> {
    log::debug!(
        "CommandExecutor: {constraint:?} size {size:?} for WinID {:?}.",
        data.window_id()
    );
    let (_, placement) = data.placement_mut();
    placement_handler::set_size_constraint(placement, constraint, device_pixel_ratio, size);
    Ok(Value::Null)
}
