/*
 * Typed form of the method-channel requests. The host sends a method name and
 * a loosely typed argument map; `WindowCommand::from_method_call` turns that
 * pair into one of the variants below, validating every required key on the
 * way in. Nothing past this module ever looks at a raw `serde_json::Value`
 * argument again.
 */
use serde_json::{Map, Value};

use crate::error::{PlatformError, Result as PlatformResult};
use crate::handlers::appbar_handler::DockRequest;
use crate::handlers::chrome_handler::Brightness;
use crate::handlers::placement_handler::{BoundsRequest, LogicalSize, SizeConstraint};
use crate::types::{AccentPolicy, HitTest};

#[derive(Debug, Clone, PartialEq)]
pub enum WindowCommand {
    Show,
    Hide,
    IsVisible,
    Focus,
    Blur,
    IsFocused,

    IsMaximized,
    Maximize { vertically: bool },
    Unmaximize,
    IsMinimized,
    Minimize,
    Restore,

    IsFullScreen,
    SetFullScreen { is_full_screen: bool },

    IsDockable,
    IsDocked,
    Dock(DockRequest),
    Undock,

    SetAspectRatio { aspect_ratio: f64 },
    SetBackgroundColor(AccentPolicy),
    GetBounds { device_pixel_ratio: f64 },
    SetBounds(BoundsRequest),
    SetSizeConstraint {
        constraint: SizeConstraint,
        device_pixel_ratio: f64,
        size: LogicalSize,
    },

    IsResizable,
    SetResizable { is_resizable: bool },
    IsMinimizable,
    SetMinimizable { is_minimizable: bool },
    IsMaximizable,
    SetMaximizable { is_maximizable: bool },
    IsClosable,
    SetClosable { is_closable: bool },
    IsAlwaysOnTop,
    SetAlwaysOnTop { is_always_on_top: bool },
    IsAlwaysOnBottom,
    SetAlwaysOnBottom { is_always_on_bottom: bool },

    GetTitle,
    SetTitle { title: String },
    SetTitleBarStyle { title_bar_style: String },
    GetTitleBarHeight,
    SetAsFrameless,
    HasShadow,
    SetHasShadow { has_shadow: bool },
    GetOpacity,
    SetOpacity { opacity: f64 },
    SetBrightness(Brightness),
    SetIcon { icon_path: String },
    SetIgnoreMouseEvents { ignore: bool },

    IsSkipTaskbar,
    SetSkipTaskbar { is_skip_taskbar: bool },
    SetProgressBar { progress: f64 },
    WaitUntilReadyToShow,

    PopUpWindowMenu,
    StartDragging,
    StartResizing(HitTest),

    IsPreventClose,
    SetPreventClose { is_prevent_close: bool },
    Close,
    Destroy,
    ForceRefresh,
    ForceChildRefresh,
}

impl WindowCommand {
    pub fn from_method_call(method: &str, args: &Value) -> PlatformResult<Self> {
        let args = MethodArgs::new(method, args);
        let command = match method {
            "show" => WindowCommand::Show,
            "hide" => WindowCommand::Hide,
            "isVisible" => WindowCommand::IsVisible,
            "focus" => WindowCommand::Focus,
            "blur" => WindowCommand::Blur,
            "isFocused" => WindowCommand::IsFocused,

            "isMaximized" => WindowCommand::IsMaximized,
            "maximize" => WindowCommand::Maximize {
                vertically: args.optional_bool("vertically")?.unwrap_or(false),
            },
            "unmaximize" => WindowCommand::Unmaximize,
            "isMinimized" => WindowCommand::IsMinimized,
            "minimize" => WindowCommand::Minimize,
            "restore" => WindowCommand::Restore,

            "isFullScreen" => WindowCommand::IsFullScreen,
            "setFullScreen" => WindowCommand::SetFullScreen {
                is_full_screen: args.required_bool("isFullScreen")?,
            },

            "isDockable" => WindowCommand::IsDockable,
            "isDocked" => WindowCommand::IsDocked,
            "dock" => WindowCommand::Dock(DockRequest {
                left: args.required_bool("left")?,
                right: args.required_bool("right")?,
                width: args.required_u32("width")?,
            }),
            "undock" => WindowCommand::Undock,

            "setAspectRatio" => WindowCommand::SetAspectRatio {
                aspect_ratio: args.required_f64("aspectRatio")?,
            },
            "setBackgroundColor" => WindowCommand::SetBackgroundColor(AccentPolicy::from_argb(
                args.required_channel("backgroundColorA")?,
                args.required_channel("backgroundColorR")?,
                args.required_channel("backgroundColorG")?,
                args.required_channel("backgroundColorB")?,
            )),
            "getBounds" => WindowCommand::GetBounds {
                device_pixel_ratio: args.device_pixel_ratio()?,
            },
            "setBounds" => WindowCommand::SetBounds(BoundsRequest {
                device_pixel_ratio: args.device_pixel_ratio()?,
                x: args.optional_f64("x")?,
                y: args.optional_f64("y")?,
                width: args.optional_f64("width")?,
                height: args.optional_f64("height")?,
            }),
            "setMinimumSize" => args.size_constraint(SizeConstraint::Minimum)?,
            "setMaximumSize" => args.size_constraint(SizeConstraint::Maximum)?,

            "isResizable" => WindowCommand::IsResizable,
            "setResizable" => WindowCommand::SetResizable {
                is_resizable: args.required_bool("isResizable")?,
            },
            "isMinimizable" => WindowCommand::IsMinimizable,
            "setMinimizable" => WindowCommand::SetMinimizable {
                is_minimizable: args.required_bool("isMinimizable")?,
            },
            "isMaximizable" => WindowCommand::IsMaximizable,
            "setMaximizable" => WindowCommand::SetMaximizable {
                is_maximizable: args.required_bool("isMaximizable")?,
            },
            "isClosable" => WindowCommand::IsClosable,
            "setClosable" => WindowCommand::SetClosable {
                is_closable: args.required_bool("isClosable")?,
            },
            "isAlwaysOnTop" => WindowCommand::IsAlwaysOnTop,
            "setAlwaysOnTop" => WindowCommand::SetAlwaysOnTop {
                is_always_on_top: args.required_bool("isAlwaysOnTop")?,
            },
            "isAlwaysOnBottom" => WindowCommand::IsAlwaysOnBottom,
            "setAlwaysOnBottom" => WindowCommand::SetAlwaysOnBottom {
                is_always_on_bottom: args.required_bool("isAlwaysOnBottom")?,
            },

            "getTitle" => WindowCommand::GetTitle,
            "setTitle" => WindowCommand::SetTitle {
                title: args.required_str("title")?,
            },
            "setTitleBarStyle" => WindowCommand::SetTitleBarStyle {
                title_bar_style: args.required_str("titleBarStyle")?,
            },
            "getTitleBarHeight" => WindowCommand::GetTitleBarHeight,
            "setAsFrameless" => WindowCommand::SetAsFrameless,
            "hasShadow" => WindowCommand::HasShadow,
            "setHasShadow" => WindowCommand::SetHasShadow {
                has_shadow: args.required_bool("hasShadow")?,
            },
            "getOpacity" => WindowCommand::GetOpacity,
            "setOpacity" => WindowCommand::SetOpacity {
                opacity: args.required_f64("opacity")?,
            },
            "setBrightness" => {
                WindowCommand::SetBrightness(Brightness::parse(&args.required_str("brightness")?))
            }
            "setIcon" => WindowCommand::SetIcon {
                icon_path: args.required_str("iconPath")?,
            },
            "setIgnoreMouseEvents" => WindowCommand::SetIgnoreMouseEvents {
                ignore: args.required_bool("ignore")?,
            },

            "isSkipTaskbar" => WindowCommand::IsSkipTaskbar,
            "setSkipTaskbar" => WindowCommand::SetSkipTaskbar {
                is_skip_taskbar: args.required_bool("isSkipTaskbar")?,
            },
            "setProgressBar" => WindowCommand::SetProgressBar {
                progress: args.required_f64("progress")?,
            },
            "waitUntilReadyToShow" => WindowCommand::WaitUntilReadyToShow,

            "popUpWindowMenu" => WindowCommand::PopUpWindowMenu,
            "startDragging" => WindowCommand::StartDragging,
            "startResizing" => WindowCommand::StartResizing(HitTest::from_edges(
                args.required_bool("top")?,
                args.required_bool("bottom")?,
                args.required_bool("left")?,
                args.required_bool("right")?,
            )),

            "isPreventClose" => WindowCommand::IsPreventClose,
            "setPreventClose" => WindowCommand::SetPreventClose {
                is_prevent_close: args.required_bool("isPreventClose")?,
            },
            "close" => WindowCommand::Close,
            "destroy" => WindowCommand::Destroy,
            "forceRefresh" => WindowCommand::ForceRefresh,
            "forceChildRefresh" => WindowCommand::ForceChildRefresh,

            _ => return Err(PlatformError::UnknownMethod(method.to_string())),
        };
        Ok(command)
    }
}

/// Extra arguments for `createWindow`; a missing `args` key means none.
pub(crate) fn create_window_args(args: &Value) -> PlatformResult<Vec<String>> {
    let reader = MethodArgs::new("createWindow", args);
    let Some(value) = reader.get("args") else {
        return Ok(Vec::new());
    };
    let invalid = || PlatformError::invalid_argument("createWindow", "args", "a list of strings");
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

/*
 * Read-only view over one call's argument map. A key holding `null` counts as
 * absent, so optional coordinates can be sent either way.
 */
struct MethodArgs<'a> {
    method: &'a str,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> MethodArgs<'a> {
    fn new(method: &'a str, args: &'a Value) -> Self {
        MethodArgs {
            method,
            map: args.as_object(),
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map?.get(key).filter(|value| !value.is_null())
    }

    fn required(&self, key: &str) -> PlatformResult<&'a Value> {
        self.get(key)
            .ok_or_else(|| PlatformError::missing_argument(self.method, key))
    }

    fn invalid(&self, key: &str, expected: &'static str) -> PlatformError {
        PlatformError::invalid_argument(self.method, key, expected)
    }

    fn required_bool(&self, key: &str) -> PlatformResult<bool> {
        self.required(key)?
            .as_bool()
            .ok_or_else(|| self.invalid(key, "a boolean"))
    }

    fn optional_bool(&self, key: &str) -> PlatformResult<Option<bool>> {
        self.get(key)
            .map(|value| value.as_bool().ok_or_else(|| self.invalid(key, "a boolean")))
            .transpose()
    }

    fn required_f64(&self, key: &str) -> PlatformResult<f64> {
        self.required(key)?
            .as_f64()
            .ok_or_else(|| self.invalid(key, "a number"))
    }

    fn optional_f64(&self, key: &str) -> PlatformResult<Option<f64>> {
        self.get(key)
            .map(|value| value.as_f64().ok_or_else(|| self.invalid(key, "a number")))
            .transpose()
    }

    // Integers sometimes arrive as whole doubles.
    fn required_i64(&self, key: &str) -> PlatformResult<i64> {
        let value = self.required(key)?;
        value
            .as_i64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|number| number.fract() == 0.0)
                    .map(|number| number as i64)
            })
            .ok_or_else(|| self.invalid(key, "an integer"))
    }

    fn required_u32(&self, key: &str) -> PlatformResult<u32> {
        u32::try_from(self.required_i64(key)?)
            .map_err(|_| self.invalid(key, "a non-negative integer"))
    }

    fn required_channel(&self, key: &str) -> PlatformResult<u8> {
        u8::try_from(self.required_i64(key)?).map_err(|_| self.invalid(key, "an integer in 0..=255"))
    }

    fn required_str(&self, key: &str) -> PlatformResult<String> {
        self.required(key)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(key, "a string"))
    }

    fn device_pixel_ratio(&self) -> PlatformResult<f64> {
        let ratio = self.required_f64("devicePixelRatio")?;
        if ratio > 0.0 {
            Ok(ratio)
        } else {
            Err(self.invalid("devicePixelRatio", "a positive number"))
        }
    }

    fn size_constraint(&self, constraint: SizeConstraint) -> PlatformResult<WindowCommand> {
        Ok(WindowCommand::SetSizeConstraint {
            constraint,
            device_pixel_ratio: self.device_pixel_ratio()?,
            size: LogicalSize {
                width: self.required_f64("width")?,
                height: self.required_f64("height")?,
            },
        })
    }
}
