/*
 * OS services that are not tied to a window class: per-monitor DPI,
 * the undocumented composition attribute used for acrylic/transparent
 * backgrounds, and the user's app theme preference.
 *
 * `GetDpiForMonitor` (shcore, Windows 8.1+) and
 * `SetWindowCompositionAttribute` (user32, undocumented) are resolved at
 * runtime and cached, so a missing export degrades to the documented
 * fallback instead of failing to load the crate.
 */
use std::ffi::c_void;
use std::sync::OnceLock;

use windows::{
    Win32::{
        Foundation::{ERROR_SUCCESS, HWND},
        Graphics::Gdi::{HMONITOR, MONITOR_DEFAULTTONEAREST, MonitorFromWindow},
        System::LibraryLoader::{GetModuleHandleW, GetProcAddress, LoadLibraryW},
        System::Registry::{HKEY_CURRENT_USER, RRF_RT_REG_DWORD, RegGetValueW},
        UI::HiDpi::MDT_EFFECTIVE_DPI,
    },
    core::{BOOL, HRESULT, s, w},
};

use crate::types::AccentPolicy;

type GetDpiForMonitorFn = unsafe extern "system" fn(HMONITOR, i32, *mut u32, *mut u32) -> HRESULT;
type SetWindowCompositionAttributeFn =
    unsafe extern "system" fn(HWND, *mut WindowCompositionAttribData) -> BOOL;

const WCA_ACCENT_POLICY: u32 = 19;

#[repr(C)]
struct AccentPolicyRaw {
    accent_state: i32,
    accent_flags: i32,
    gradient_color: u32,
    animation_id: i32,
}

#[repr(C)]
struct WindowCompositionAttribData {
    attrib: u32,
    pv_data: *mut c_void,
    cb_data: usize,
}

fn get_dpi_for_monitor_fn() -> Option<GetDpiForMonitorFn> {
    static GET_DPI_FOR_MONITOR: OnceLock<Option<GetDpiForMonitorFn>> = OnceLock::new();
    *GET_DPI_FOR_MONITOR.get_or_init(|| unsafe {
        let module = match LoadLibraryW(w!("Shcore.dll")) {
            Ok(module) => module,
            Err(err) => {
                log::debug!("System: Shcore.dll unavailable, DPI queries fall back: {err:?}");
                return None;
            }
        };
        GetProcAddress(module, s!("GetDpiForMonitor"))
            .map(|ptr| std::mem::transmute::<_, GetDpiForMonitorFn>(ptr))
    })
}

fn set_window_composition_attribute_fn() -> Option<SetWindowCompositionAttributeFn> {
    static SET_WCA: OnceLock<Option<SetWindowCompositionAttributeFn>> = OnceLock::new();
    *SET_WCA.get_or_init(|| unsafe {
        let module = GetModuleHandleW(w!("user32.dll")).ok()?;
        GetProcAddress(module, s!("SetWindowCompositionAttribute"))
            .map(|ptr| std::mem::transmute::<_, SetWindowCompositionAttributeFn>(ptr))
    })
}

/// Effective DPI of the monitor nearest to `hwnd`.
pub(crate) fn monitor_dpi(hwnd: HWND) -> Option<u32> {
    let get_dpi_for_monitor = get_dpi_for_monitor_fn()?;
    let mut dpi_x: u32 = 0;
    let mut dpi_y: u32 = 0;
    let result = unsafe {
        let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
        get_dpi_for_monitor(monitor, MDT_EFFECTIVE_DPI.0, &mut dpi_x, &mut dpi_y)
    };
    if result.is_err() {
        log::warn!("System: GetDpiForMonitor failed with {result:?}.");
        return None;
    }
    Some(dpi_x)
}

pub(crate) fn set_accent_policy(hwnd: HWND, policy: AccentPolicy) -> bool {
    let Some(set_window_composition_attribute) = set_window_composition_attribute_fn() else {
        return false;
    };
    let mut accent = AccentPolicyRaw {
        accent_state: policy.state as i32,
        accent_flags: policy.flags,
        gradient_color: policy.color,
        animation_id: 0,
    };
    let mut data = WindowCompositionAttribData {
        attrib: WCA_ACCENT_POLICY,
        pv_data: &mut accent as *mut AccentPolicyRaw as *mut c_void,
        cb_data: std::mem::size_of::<AccentPolicyRaw>(),
    };
    unsafe { set_window_composition_attribute(hwnd, &mut data) }.as_bool()
}

/// Reads `AppsUseLightTheme`; `None` when the value is missing (pre-1809 builds).
pub(crate) fn apps_use_light_theme() -> Option<bool> {
    let mut value: u32 = 0;
    let mut size = std::mem::size_of::<u32>() as u32;
    let status = unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            w!(r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize"),
            w!("AppsUseLightTheme"),
            RRF_RT_REG_DWORD,
            None,
            Some(&mut value as *mut u32 as *mut c_void),
            Some(&mut size),
        )
    };
    if status != ERROR_SUCCESS {
        log::debug!("System: AppsUseLightTheme not readable ({status:?}).");
        return None;
    }
    Some(value != 0)
}
