/*
 * Platform-agnostic types shared between the command parser, the window
 * handlers and the native backend. Nothing here touches Win32, so the whole
 * module compiles (and is tested) on every platform. Style bits and
 * positioning flags carry the numeric values Win32 uses so the Windows
 * backend can pass them through unchanged.
 */
use serde::Serialize;
use std::ops::{BitOr, BitOrAssign};

/*
 * Logical identifier for a managed window, the only window identity visible
 * to callers. The native handle stays inside the backend.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WindowId(pub i64);

impl WindowId {
    /// Returned by `createWindow` when no window factory is installed.
    pub const INVALID: WindowId = WindowId(-1);
    /// The host's own top-level window.
    pub const MAIN: WindowId = WindowId(0);

    pub const fn new(raw: i64) -> Self {
        WindowId(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }
}

/// Screen rectangle in physical pixels, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Window bounds in logical pixels as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn from_rect(rect: Rect, device_pixel_ratio: f64) -> Self {
        Bounds {
            x: rect.left as f64 / device_pixel_ratio,
            y: rect.top as f64 / device_pixel_ratio,
            width: rect.width() as f64 / device_pixel_ratio,
            height: rect.height() as f64 / device_pixel_ratio,
        }
    }
}

/// Screen edge an AppBar is anchored to. Values match `ABE_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppBarEdge {
    Left = 0,
    Top = 1,
    Right = 2,
    Bottom = 3,
}

impl AppBarEdge {
    pub fn is_vertical(self) -> bool {
        matches!(self, AppBarEdge::Left | AppBarEdge::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DockState {
    #[default]
    Undocked,
    DockedLeft,
    DockedRight,
}

impl DockState {
    /// Encoding used by the `isDocked` reply.
    pub fn wire_value(self) -> i64 {
        match self {
            DockState::Undocked => 0,
            DockState::DockedLeft => 1,
            DockState::DockedRight => 2,
        }
    }

    pub fn from_edge(edge: AppBarEdge) -> Self {
        match edge {
            AppBarEdge::Right => DockState::DockedRight,
            _ => DockState::DockedLeft,
        }
    }
}

/// Placement of a top-level window as reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowState {
    Normal,
    Maximized,
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysCommand {
    Maximize,
    Minimize,
    Restore,
    Close,
    /// `SC_MOVE | HTCAPTION`: begins a caption drag.
    MoveByCaption,
    /// A command picked from the system menu, passed through untouched.
    Raw(u32),
}

/// Whether a system command is delivered synchronously or queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Send,
    Post,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Top,
    Bottom,
    TopMost,
    NoTopMost,
}

/// `SWP_*` flags for `set_window_pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PosFlags(pub u32);

impl PosFlags {
    pub const NONE: PosFlags = PosFlags(0);
    pub const NOSIZE: PosFlags = PosFlags(0x0001);
    pub const NOMOVE: PosFlags = PosFlags(0x0002);
    pub const NOZORDER: PosFlags = PosFlags(0x0004);
    pub const NOACTIVATE: PosFlags = PosFlags(0x0010);
    pub const FRAMECHANGED: PosFlags = PosFlags(0x0020);
    pub const NOOWNERZORDER: PosFlags = PosFlags(0x0200);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: PosFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PosFlags {
    type Output = PosFlags;

    fn bitor(self, rhs: PosFlags) -> PosFlags {
        PosFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for PosFlags {
    fn bitor_assign(&mut self, rhs: PosFlags) {
        self.0 |= rhs.0;
    }
}

/// Arguments of a single `SetWindowPos` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPos {
    pub insert_after: Option<ZOrder>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub flags: PosFlags,
}

impl WindowPos {
    pub fn to_rect(insert_after: Option<ZOrder>, rect: Rect, flags: PosFlags) -> Self {
        WindowPos {
            insert_after,
            x: rect.left,
            y: rect.top,
            width: rect.width(),
            height: rect.height(),
            flags,
        }
    }

    /// Z-order change only; position and size are left alone.
    pub fn z_order(insert_after: ZOrder) -> Self {
        WindowPos {
            insert_after: Some(insert_after),
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            flags: PosFlags::NOMOVE | PosFlags::NOSIZE,
        }
    }
}

/// Window and class style bits (`WS_*`, `WS_EX_*`, `CS_*`).
pub mod style {
    pub const WS_VISIBLE: u32 = 0x1000_0000;
    pub const WS_OVERLAPPEDWINDOW: u32 = 0x00CF_0000;
    pub const WS_THICKFRAME: u32 = 0x0004_0000;
    pub const WS_MINIMIZEBOX: u32 = 0x0002_0000;
    pub const WS_MAXIMIZEBOX: u32 = 0x0001_0000;

    pub const WS_EX_TOPMOST: u32 = 0x0000_0008;
    pub const WS_EX_TRANSPARENT: u32 = 0x0000_0020;
    pub const WS_EX_LAYERED: u32 = 0x0008_0000;

    pub const CS_NOCLOSE: u32 = 0x0000_0200;

    pub fn with(bits: u32, flag: u32, enabled: bool) -> u32 {
        if enabled { bits | flag } else { bits & !flag }
    }
}

/// Non-client hit-test codes used to start a system drag or resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTest {
    Left = 10,
    Right = 11,
    Top = 12,
    TopLeft = 13,
    TopRight = 14,
    Bottom = 15,
    BottomLeft = 16,
    BottomRight = 17,
}

impl HitTest {
    /// Maps the edges requested by `startResizing` to a hit-test code.
    /// Combinations that name no single edge or corner fall back to bottom-right.
    pub fn from_edges(top: bool, bottom: bool, left: bool, right: bool) -> Self {
        match (top, bottom, left, right) {
            (true, false, false, false) => HitTest::Top,
            (true, false, true, false) => HitTest::TopLeft,
            (false, false, true, false) => HitTest::Left,
            (false, false, false, true) => HitTest::Right,
            (true, false, false, true) => HitTest::TopRight,
            (false, true, false, false) => HitTest::Bottom,
            (false, true, true, false) => HitTest::BottomLeft,
            _ => HitTest::BottomRight,
        }
    }
}

/// Taskbar button progress state. Values match `TBPF_*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    NoProgress = 0,
    Indeterminate = 1,
    Normal = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskbarProgress {
    pub state: ProgressState,
    pub completed: u64,
    pub total: u64,
}

/// `DwmExtendFrameIntoClientArea` margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Margins {
    pub const ZERO: Margins = Margins {
        left: 0,
        right: 0,
        top: 0,
        bottom: 0,
    };
    /// A one-pixel top frame is enough for DWM to draw a shadow.
    pub const SHADOW: Margins = Margins {
        left: 0,
        right: 0,
        top: 1,
        bottom: 0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentState {
    Gradient = 1,
    TransparentGradient = 2,
}

/// Accent policy handed to `SetWindowCompositionAttribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccentPolicy {
    pub state: AccentState,
    pub flags: i32,
    /// Packed as `A<<24 | B<<16 | G<<8 | R`.
    pub color: u32,
}

impl AccentPolicy {
    pub fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        let transparent = a == 0 && r == 0 && g == 0 && b == 0;
        AccentPolicy {
            state: if transparent {
                AccentState::TransparentGradient
            } else {
                AccentState::Gradient
            },
            flags: 2,
            color: ((a as u32) << 24) | ((b as u32) << 16) | ((g as u32) << 8) | r as u32,
        }
    }
}
