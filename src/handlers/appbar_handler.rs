/*
 * Docks a window to a screen edge as a shell AppBar. Docking follows the
 * shell's registration protocol: ABM_NEW once, then for every (re)position a
 * QUERYPOS / adjust / SETPOS round trip, and ABM_REMOVE on undock.
 *
 * The QUERYPOS answer is only trusted for where the bar may start. The shell
 * is free to shrink the bar when other bars already occupy the edge, so the
 * requested thickness is re-applied to the approved rectangle before it is
 * committed.
 */
use crate::config::ManagerConfig;
use crate::error::Result as PlatformResult;
use crate::native::NativeWindow;
use crate::types::{AppBarEdge, DockState, PosFlags, Rect, WindowPos, ZOrder};

const BASELINE_DPI: f64 = 96.0;

/// Per-window AppBar bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct AppBarState {
    registered: bool,
    dock_state: DockState,
}

impl AppBarState {
    pub(crate) fn is_registered(&self) -> bool {
        self.registered
    }

    pub(crate) fn dock_state(&self) -> DockState {
        self.dock_state
    }
}

/// A parsed `dock` request. `width` is in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockRequest {
    pub left: bool,
    pub right: bool,
    pub width: u32,
}

impl DockRequest {
    /// Right only when right is asked for alone; every other combination docks left.
    pub fn edge(&self) -> AppBarEdge {
        if self.right && !self.left {
            AppBarEdge::Right
        } else {
            AppBarEdge::Left
        }
    }
}

/*
 * Registers the window with the AppBar subsystem. Returns true only when a
 * new registration happened; asking again while registered is a no-op that
 * returns false, as is a registration the shell refuses.
 */
pub(crate) fn register(
    native: &dyn NativeWindow,
    state: &mut AppBarState,
    callback_message: u32,
) -> bool {
    if state.registered {
        log::trace!("AppBarHandler: already registered, skipping ABM_NEW.");
        return false;
    }
    if !native.appbar_new(callback_message) {
        log::warn!("AppBarHandler: shell rejected ABM_NEW registration.");
        return false;
    }
    state.registered = true;
    true
}

/*
 * Removes the AppBar registration. Returns whether anything was removed;
 * DockState is reset either way.
 */
pub(crate) fn undock(native: &dyn NativeWindow, state: &mut AppBarState) -> bool {
    let removed = if state.registered {
        native.appbar_remove();
        state.registered = false;
        true
    } else {
        false
    };
    state.dock_state = DockState::Undocked;
    log::debug!("AppBarHandler: undock (removed registration: {removed}).");
    removed
}

/*
 * Docks the window to the requested edge. Registration is skipped when the
 * window is already an AppBar, but positioning always runs so edge and width
 * can change while docked. Returns false if the shell refused registration.
 *
 * The bar is never thicker than the screen is wide. If positioning fails the
 * registration is dropped again, so a window is registered exactly while it
 * is docked.
 */
pub(crate) fn dock(
    native: &dyn NativeWindow,
    state: &mut AppBarState,
    config: &ManagerConfig,
    request: DockRequest,
) -> PlatformResult<bool> {
    let scale = dpi_scale(native.monitor_dpi(), config.fallback_dpi());

    register(native, state, config.appbar_callback_message);
    if !state.is_registered() {
        return Ok(false);
    }

    let edge = request.edge();
    let (screen_width, _) = native.screen_size();
    let thickness = scale_to_physical(request.width, scale).min(screen_width.max(0));
    let candidate = initial_dock_rect(edge, thickness, screen_width);
    log::debug!(
        "AppBarHandler: docking to {edge:?}, {} logical px -> {thickness} px (scale {scale}).",
        request.width
    );

    let committed = match query_and_set_position(native, edge, candidate) {
        Ok(committed) => committed,
        Err(err) => {
            log::warn!("AppBarHandler: positioning failed, dropping registration: {err}");
            undock(native, state);
            return Err(err);
        }
    };
    state.dock_state = DockState::from_edge(edge);
    log::trace!("AppBarHandler: committed AppBar rect {committed:?}.");
    Ok(true)
}

/*
 * The QUERYPOS / adjust / SETPOS exchange followed by moving the window onto
 * the committed rectangle.
 */
pub(crate) fn query_and_set_position(
    native: &dyn NativeWindow,
    edge: AppBarEdge,
    rect: Rect,
) -> PlatformResult<Rect> {
    let extent = if edge.is_vertical() {
        rect.width()
    } else {
        rect.height()
    };
    let candidate = span_full_screen(edge, rect, native.screen_size());
    let approved = native.appbar_query_pos(edge, candidate);
    let adjusted = reapply_extent(edge, approved, extent);
    let committed = native.appbar_set_pos(edge, adjusted);

    native.set_window_pos(WindowPos::to_rect(
        Some(ZOrder::Top),
        committed,
        PosFlags::NONE,
    ))?;
    Ok(committed)
}

pub(crate) fn dpi_scale(dpi: Option<u32>, fallback_dpi: u32) -> f64 {
    let dpi = dpi.filter(|dpi| *dpi > 0).unwrap_or(fallback_dpi);
    dpi as f64 / BASELINE_DPI
}

pub(crate) fn scale_to_physical(logical: u32, scale: f64) -> i32 {
    (logical as f64 * scale + 0.5) as i32
}

fn initial_dock_rect(edge: AppBarEdge, thickness: i32, screen_width: i32) -> Rect {
    match edge {
        AppBarEdge::Right => Rect::new(screen_width - thickness, 0, screen_width, 0),
        _ => Rect::new(0, 0, thickness, 0),
    }
}

// Bars span the whole screen along their edge.
fn span_full_screen(edge: AppBarEdge, rect: Rect, (screen_w, screen_h): (i32, i32)) -> Rect {
    if edge.is_vertical() {
        Rect::new(rect.left, 0, rect.right, screen_h)
    } else {
        Rect::new(0, rect.top, screen_w, rect.bottom)
    }
}

fn reapply_extent(edge: AppBarEdge, approved: Rect, extent: i32) -> Rect {
    let mut rect = approved;
    match edge {
        AppBarEdge::Left => rect.right = rect.left.saturating_add(extent),
        AppBarEdge::Right => rect.left = rect.right.saturating_sub(extent),
        AppBarEdge::Top => rect.bottom = rect.top.saturating_add(extent),
        AppBarEdge::Bottom => rect.top = rect.bottom.saturating_sub(extent),
    }
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeWindow};

    fn dock_request(left: bool, right: bool, width: u32) -> DockRequest {
        DockRequest { left, right, width }
    }

    #[test]
    fn undock_after_dock_resets_state_and_second_undock_fails() {
        let fake = FakeWindow::new();
        let mut state = AppBarState::default();
        let config = ManagerConfig::default();

        assert!(dock(&fake, &mut state, &config, dock_request(true, false, 200)).unwrap());
        assert_eq!(state.dock_state(), DockState::DockedLeft);

        assert!(undock(&fake, &mut state));
        assert_eq!(state.dock_state(), DockState::Undocked);
        assert!(!state.is_registered());

        assert!(!undock(&fake, &mut state));
        assert_eq!(state.dock_state(), DockState::Undocked);
        let removals = fake
            .calls()
            .iter()
            .filter(|c| **c == Call::AppBarRemove)
            .count();
        assert_eq!(removals, 1);
    }

    #[test]
    fn redock_to_right_switches_edge_without_reregistering() {
        let fake = FakeWindow::with_state(|s| s.dpi = Some(144));
        let mut state = AppBarState::default();
        let config = ManagerConfig::default();

        dock(&fake, &mut state, &config, dock_request(true, false, 100)).unwrap();
        assert_eq!(state.dock_state(), DockState::DockedLeft);
        dock(&fake, &mut state, &config, dock_request(false, true, 100)).unwrap();
        assert_eq!(state.dock_state(), DockState::DockedRight);

        let registrations = fake
            .calls()
            .iter()
            .filter(|c| **c == Call::AppBarNew)
            .count();
        assert_eq!(registrations, 1);

        // 100 logical px at 144 DPI is 150 physical px.
        let rect = fake.state().rect;
        assert_eq!(rect.left, 1920 - 150);
        assert_eq!(rect.right, 1920);
        assert_eq!(rect.top, 0);
        assert_eq!(rect.bottom, 1080);
    }

    #[test]
    fn both_edges_requested_docks_left() {
        assert_eq!(dock_request(true, true, 10).edge(), AppBarEdge::Left);
        assert_eq!(dock_request(false, false, 10).edge(), AppBarEdge::Left);
        assert_eq!(dock_request(false, true, 10).edge(), AppBarEdge::Right);
    }

    #[test]
    fn rejected_registration_leaves_window_undocked() {
        let fake = FakeWindow::with_state(|s| s.appbar_accepts = false);
        let mut state = AppBarState::default();

        let docked = dock(
            &fake,
            &mut state,
            &ManagerConfig::default(),
            dock_request(true, false, 200),
        )
        .unwrap();

        assert!(!docked);
        assert_eq!(state.dock_state(), DockState::Undocked);
        assert!(!state.is_registered());
        assert!(
            !fake
                .calls()
                .iter()
                .any(|c| matches!(c, Call::AppBarQueryPos(..)))
        );
    }

    #[test]
    fn register_twice_is_a_failed_no_op() {
        let fake = FakeWindow::new();
        let mut state = AppBarState::default();
        assert!(register(&fake, &mut state, 0x401));
        assert!(!register(&fake, &mut state, 0x401));
        assert_eq!(fake.calls(), vec![Call::AppBarNew]);
    }

    #[test]
    fn missing_dpi_uses_unscaled_width() {
        let fake = FakeWindow::with_state(|s| s.dpi = None);
        let mut state = AppBarState::default();

        dock(
            &fake,
            &mut state,
            &ManagerConfig::default(),
            dock_request(true, false, 250),
        )
        .unwrap();

        assert_eq!(fake.state().rect, Rect::new(0, 0, 250, 1080));
    }

    #[test]
    fn query_pos_shift_keeps_requested_width() {
        let fake = FakeWindow::with_state(|s| s.reserved_left = 60);

        let committed =
            query_and_set_position(&fake, AppBarEdge::Left, Rect::new(0, 0, 40, 0)).unwrap();

        // The shell moved the bar past the existing one; width is re-applied.
        assert_eq!(committed, Rect::new(60, 0, 100, 1080));
        assert_eq!(fake.state().rect, committed);
    }

    #[test]
    fn query_is_sent_with_full_height_for_vertical_bars() {
        let fake = FakeWindow::new();
        query_and_set_position(&fake, AppBarEdge::Right, Rect::new(1800, 0, 1920, 0)).unwrap();
        assert!(fake.calls().contains(&Call::AppBarQueryPos(
            AppBarEdge::Right,
            Rect::new(1800, 0, 1920, 1080)
        )));
    }

    #[test]
    fn horizontal_edges_reapply_height() {
        let approved = Rect::new(0, 0, 1920, 1080);
        assert_eq!(
            reapply_extent(AppBarEdge::Top, approved, 48),
            Rect::new(0, 0, 1920, 48)
        );
        assert_eq!(
            reapply_extent(AppBarEdge::Bottom, approved, 48),
            Rect::new(0, 1032, 1920, 1080)
        );
        assert_eq!(
            span_full_screen(AppBarEdge::Top, Rect::new(300, 0, 400, 48), (1920, 1080)),
            Rect::new(0, 0, 1920, 48)
        );
    }

    #[test]
    fn oversized_width_is_clamped_to_screen_next_to_existing_bar() {
        let fake = FakeWindow::with_state(|s| s.reserved_left = 60);
        let mut state = AppBarState::default();

        let docked = dock(
            &fake,
            &mut state,
            &ManagerConfig::default(),
            dock_request(true, false, 3_000_000_000),
        )
        .unwrap();

        assert!(docked);
        assert_eq!(state.dock_state(), DockState::DockedLeft);
        assert_eq!(fake.state().rect, Rect::new(60, 0, 60 + 1920, 1080));
    }

    #[test]
    fn extent_arithmetic_saturates() {
        let approved = Rect::new(60, 0, 100, 1080);
        assert_eq!(
            reapply_extent(AppBarEdge::Left, approved, i32::MAX).right,
            i32::MAX
        );
        assert_eq!(
            reapply_extent(AppBarEdge::Right, Rect::new(-10, 0, -5, 1080), i32::MAX).left,
            i32::MIN
        );
    }

    #[test]
    fn failed_positioning_drops_fresh_registration() {
        let fake = FakeWindow::with_state(|s| s.fail_set_window_pos = true);
        let mut state = AppBarState::default();

        let result = dock(
            &fake,
            &mut state,
            &ManagerConfig::default(),
            dock_request(false, true, 120),
        );

        assert!(result.is_err());
        assert!(!state.is_registered());
        assert_eq!(state.dock_state(), DockState::Undocked);
        assert_eq!(fake.calls().last(), Some(&Call::AppBarRemove));
    }

    #[test]
    fn dpi_scale_rounds_to_nearest_pixel() {
        assert_eq!(dpi_scale(Some(120), 96), 1.25);
        assert_eq!(dpi_scale(Some(0), 96), 1.0);
        assert_eq!(scale_to_physical(101, 1.25), 126);
        assert_eq!(scale_to_physical(100, 1.0), 100);
    }
}
