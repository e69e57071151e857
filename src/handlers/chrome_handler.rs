/*
 * Window chrome: title text, title-bar style and frameless mode, DWM frame
 * margins (shadow), layered opacity, composition background, dark-mode
 * decorations, icons and mouse pass-through.
 */
use crate::error::{PlatformError, Result as PlatformResult};
use crate::native::NativeWindow;
use crate::types::{AccentPolicy, Margins, PosFlags, Rect, WindowPos, style};

#[derive(Debug)]
pub(crate) struct ChromeState {
    is_frameless: bool,
    has_shadow: bool,
    title_bar_style: String,
    opacity: f64,
}

impl Default for ChromeState {
    fn default() -> Self {
        ChromeState {
            is_frameless: false,
            has_shadow: true,
            title_bar_style: "normal".to_string(),
            opacity: 1.0,
        }
    }
}

impl ChromeState {
    pub(crate) fn is_frameless(&self) -> bool {
        self.is_frameless
    }

    pub(crate) fn set_frameless(&mut self, frameless: bool) {
        self.is_frameless = frameless;
    }

    pub(crate) fn title_bar_style(&self) -> &str {
        &self.title_bar_style
    }

    pub(crate) fn set_title_bar_style_value(&mut self, title_bar_style: String) {
        self.title_bar_style = title_bar_style;
    }

    /// Framed windows always have the system shadow.
    pub(crate) fn has_shadow(&self) -> bool {
        if self.is_frameless {
            self.has_shadow
        } else {
            true
        }
    }

    pub(crate) fn opacity(&self) -> f64 {
        self.opacity
    }
}

/// Requested window brightness. Anything but "dark" counts as light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brightness {
    Light,
    Dark,
}

impl Brightness {
    pub fn parse(value: &str) -> Self {
        if value == "dark" {
            Brightness::Dark
        } else {
            Brightness::Light
        }
    }
}

fn refresh_frame(native: &dyn NativeWindow) -> PlatformResult<()> {
    native.set_window_pos(WindowPos {
        insert_after: None,
        x: 0,
        y: 0,
        width: 0,
        height: 0,
        flags: PosFlags::NOZORDER
            | PosFlags::NOOWNERZORDER
            | PosFlags::NOMOVE
            | PosFlags::NOSIZE
            | PosFlags::FRAMECHANGED,
    })
}

pub(crate) fn set_as_frameless(
    native: &dyn NativeWindow,
    chrome: &mut ChromeState,
) -> PlatformResult<()> {
    chrome.set_frameless(true);
    refresh_frame(native)
}

/*
 * Stores the requested title-bar style and leaves frameless mode, so a window
 * made frameless earlier can get its normal or hidden title bar back.
 */
pub(crate) fn set_title_bar_style(
    native: &dyn NativeWindow,
    chrome: &mut ChromeState,
    title_bar_style: String,
) -> PlatformResult<()> {
    log::debug!("ChromeHandler: title bar style -> '{title_bar_style}'.");
    chrome.title_bar_style = title_bar_style;
    chrome.is_frameless = false;
    native.extend_frame_into_client_area(Margins::ZERO)?;
    refresh_frame(native)
}

/// Only frameless windows manage their own shadow; the call is ignored otherwise.
pub(crate) fn set_has_shadow(
    native: &dyn NativeWindow,
    chrome: &mut ChromeState,
    has_shadow: bool,
) -> PlatformResult<()> {
    if !chrome.is_frameless {
        log::trace!("ChromeHandler: ignoring setHasShadow on a framed window.");
        return Ok(());
    }
    chrome.has_shadow = has_shadow;
    let margins = if has_shadow {
        Margins::SHADOW
    } else {
        Margins::ZERO
    };
    native.extend_frame_into_client_area(margins)
}

pub(crate) fn set_opacity(
    native: &dyn NativeWindow,
    chrome: &mut ChromeState,
    opacity: f64,
) -> PlatformResult<()> {
    let opacity = opacity.clamp(0.0, 1.0);
    chrome.opacity = opacity;
    native.set_ex_style(native.ex_style() | style::WS_EX_LAYERED);
    native.set_layered_alpha(opacity_to_alpha(opacity))
}

pub(crate) fn opacity_to_alpha(opacity: f64) -> u8 {
    (255.0 * opacity.clamp(0.0, 1.0)).round() as u8
}

/// Without the composition attribute API the background is left as it is.
pub(crate) fn set_background_color(native: &dyn NativeWindow, policy: AccentPolicy) {
    if !native.set_accent_policy(policy) {
        log::warn!("ChromeHandler: SetWindowCompositionAttribute unavailable, background unchanged.");
    }
}

/*
 * Dark decorations are used only when the user's app theme is dark and the
 * host asks for dark. When the theme preference can't be read nothing is
 * changed.
 */
pub(crate) fn set_brightness(
    native: &dyn NativeWindow,
    brightness: Brightness,
) -> PlatformResult<()> {
    let Some(light_theme) = native.apps_use_light_theme() else {
        log::debug!("ChromeHandler: theme preference unavailable, leaving decorations as-is.");
        return Ok(());
    };
    let dark = !light_theme && brightness == Brightness::Dark;
    native.set_dark_decorations(dark)
}

pub(crate) fn set_icon(native: &dyn NativeWindow, icon_path: &str) -> PlatformResult<()> {
    if icon_path.is_empty() {
        return Err(PlatformError::OperationFailed("icon path is empty".into()));
    }
    native.set_icon_from_file(icon_path)
}

pub(crate) fn set_ignore_mouse_events(native: &dyn NativeWindow, ignore: bool) {
    let bits = style::WS_EX_TRANSPARENT | style::WS_EX_LAYERED;
    native.set_ex_style(style::with(native.ex_style(), bits, ignore));
}

/*
 * Nudges the window width by one pixel and back so the frame and child
 * layout are recomputed.
 */
pub(crate) fn force_refresh(native: &dyn NativeWindow) -> PlatformResult<()> {
    let rect = native.window_rect()?;
    for pos in refresh_nudge(rect) {
        native.set_window_pos(pos)?;
    }
    Ok(())
}

/// Same nudge applied to the embedded content view only.
pub(crate) fn force_child_refresh(native: &dyn NativeWindow) -> PlatformResult<()> {
    let Some(rect) = native.child_rect()? else {
        log::debug!("ChromeHandler: no child window to refresh.");
        return Ok(());
    };
    for pos in refresh_nudge(rect) {
        native.set_child_pos(pos)?;
    }
    Ok(())
}

fn refresh_nudge(rect: Rect) -> [WindowPos; 2] {
    let flags = PosFlags::NOZORDER
        | PosFlags::NOOWNERZORDER
        | PosFlags::NOMOVE
        | PosFlags::FRAMECHANGED;
    [rect.width() + 1, rect.width()].map(|width| WindowPos {
        insert_after: None,
        x: rect.left,
        y: rect.top,
        width,
        height: rect.height(),
        flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeWindow};

    #[test]
    fn title_bar_style_clears_frameless() {
        let fake = FakeWindow::new();
        let mut chrome = ChromeState::default();
        set_as_frameless(&fake, &mut chrome).unwrap();
        assert!(chrome.is_frameless());

        set_title_bar_style(&fake, &mut chrome, "hidden".into()).unwrap();
        assert!(!chrome.is_frameless());
        assert_eq!(chrome.title_bar_style(), "hidden");
        assert!(fake.calls().contains(&Call::ExtendFrame(Margins::ZERO)));
    }

    #[test]
    fn shadow_applies_only_when_frameless() {
        let fake = FakeWindow::new();
        let mut chrome = ChromeState::default();

        set_has_shadow(&fake, &mut chrome, false).unwrap();
        assert!(chrome.has_shadow());
        assert!(fake.calls().is_empty());

        chrome.set_frameless(true);
        set_has_shadow(&fake, &mut chrome, false).unwrap();
        assert!(!chrome.has_shadow());
        set_has_shadow(&fake, &mut chrome, true).unwrap();
        assert_eq!(
            fake.calls(),
            vec![
                Call::ExtendFrame(Margins::ZERO),
                Call::ExtendFrame(Margins::SHADOW)
            ]
        );
    }

    #[test]
    fn opacity_sets_layered_style_and_alpha() {
        let fake = FakeWindow::new();
        let mut chrome = ChromeState::default();
        set_opacity(&fake, &mut chrome, 0.5).unwrap();

        assert_eq!(chrome.opacity(), 0.5);
        assert_ne!(fake.state().ex_style & style::WS_EX_LAYERED, 0);
        assert!(fake.calls().contains(&Call::SetLayeredAlpha(128)));
        assert_eq!(opacity_to_alpha(1.7), 255);
        assert_eq!(opacity_to_alpha(-1.0), 0);
    }

    #[test]
    fn brightness_dark_requires_dark_system_theme() {
        let fake = FakeWindow::with_state(|s| s.light_theme = Some(true));
        set_brightness(&fake, Brightness::Dark).unwrap();
        assert_eq!(fake.calls(), vec![Call::SetDarkDecorations(false)]);

        let fake = FakeWindow::with_state(|s| s.light_theme = Some(false));
        set_brightness(&fake, Brightness::parse("dark")).unwrap();
        assert_eq!(fake.calls(), vec![Call::SetDarkDecorations(true)]);

        let fake = FakeWindow::with_state(|s| s.light_theme = None);
        set_brightness(&fake, Brightness::Dark).unwrap();
        assert!(fake.calls().is_empty());
    }

    #[test]
    fn ignore_mouse_events_toggles_transparent_layered_bits() {
        let fake = FakeWindow::new();
        set_ignore_mouse_events(&fake, true);
        assert_eq!(
            fake.state().ex_style,
            style::WS_EX_TRANSPARENT | style::WS_EX_LAYERED
        );
        set_ignore_mouse_events(&fake, false);
        assert_eq!(fake.state().ex_style, 0);
    }

    #[test]
    fn force_refresh_grows_then_restores_width() {
        let fake = FakeWindow::new();
        let before = fake.state().rect;
        force_refresh(&fake).unwrap();
        assert_eq!(fake.state().rect, before);
        let widths: Vec<i32> = fake
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::SetWindowPos(pos) => Some(pos.width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![before.width() + 1, before.width()]);
    }

    #[test]
    fn force_child_refresh_nudges_only_the_child() {
        let fake = FakeWindow::new();
        let child = fake.state().child.unwrap();
        force_child_refresh(&fake).unwrap();

        let calls = fake.calls();
        assert!(!calls.iter().any(|c| matches!(c, Call::SetWindowPos(_))));
        let widths: Vec<i32> = calls
            .iter()
            .filter_map(|c| match c {
                Call::SetChildPos(pos) => Some(pos.width),
                _ => None,
            })
            .collect();
        assert_eq!(widths, vec![child.width() + 1, child.width()]);
    }

    #[test]
    fn force_child_refresh_without_child_does_nothing() {
        let fake = FakeWindow::with_state(|s| s.child = None);
        force_child_refresh(&fake).unwrap();
        assert!(fake.calls().is_empty());
    }
}
