/*
 * Entry point for the host. `PlatformInterface` owns the window registry and
 * the optional window factory, and turns each method-channel call into a
 * typed command executed against the addressed window.
 *
 * Window ids are the only identity callers see. The host's own window is
 * attached as `WindowId::MAIN`; windows made through `createWindow` get ids
 * 1, 2, ... in creation order.
 */
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde_json::Value;

use crate::command_executor;
use crate::commands::{self, WindowCommand};
use crate::config::ManagerConfig;
use crate::error::{PlatformError, Result as PlatformResult};
use crate::handlers::appbar_handler;
use crate::handlers::placement_handler::{self, TrackSizeLimits};
use crate::native::NativeWindow;
use crate::types::WindowId;
use crate::window_common::NativeWindowData;

/*
 * Creates the native window for a `createWindow` request. `args[0]` is the
 * decimal window id that was allocated for it, followed by the caller's own
 * arguments.
 */
pub trait WindowFactory {
    fn create_window(&mut self, args: &[String]) -> PlatformResult<Box<dyn NativeWindow>>;
}

impl<F> WindowFactory for F
where
    F: FnMut(&[String]) -> PlatformResult<Box<dyn NativeWindow>>,
{
    fn create_window(&mut self, args: &[String]) -> PlatformResult<Box<dyn NativeWindow>> {
        self(args)
    }
}

/// What the host may ask about a window while a command on it is running.
#[derive(Debug, Clone, Copy)]
struct PublishedState {
    size_limits: TrackSizeLimits,
    prevent_close: bool,
}

impl PublishedState {
    fn of(data: &NativeWindowData) -> Self {
        PublishedState {
            size_limits: placement_handler::track_size_limits(data.placement()),
            prevent_close: data.is_prevent_close(),
        }
    }
}

/*
 * Per-window state keyed by logical id. The map is only borrowed long enough
 * to find a window, so the OS can call back into the host (for example
 * WM_GETMINMAXINFO during SetWindowPos) while a command is executing. Those
 * callbacks read the published copy, which is refreshed after every write.
 */
#[derive(Debug, Default)]
pub(crate) struct WindowRegistry {
    windows: RefCell<BTreeMap<WindowId, Rc<RefCell<NativeWindowData>>>>,
    published: RefCell<BTreeMap<WindowId, PublishedState>>,
}

impl WindowRegistry {
    pub(crate) fn insert(&self, data: NativeWindowData) {
        let window_id = data.window_id();
        self.published
            .borrow_mut()
            .insert(window_id, PublishedState::of(&data));
        if self
            .windows
            .borrow_mut()
            .insert(window_id, Rc::new(RefCell::new(data)))
            .is_some()
        {
            log::warn!("WindowRegistry: replaced existing entry for {window_id:?}.");
        }
    }

    pub(crate) fn remove(&self, window_id: WindowId) -> Option<Rc<RefCell<NativeWindowData>>> {
        self.published.borrow_mut().remove(&window_id);
        self.windows.borrow_mut().remove(&window_id)
    }

    pub(crate) fn contains(&self, window_id: WindowId) -> bool {
        self.windows.borrow().contains_key(&window_id)
    }

    fn entry(&self, window_id: WindowId) -> PlatformResult<Rc<RefCell<NativeWindowData>>> {
        self.windows
            .borrow()
            .get(&window_id)
            .cloned()
            .ok_or(PlatformError::WindowNotFound(window_id))
    }

    fn published(&self, window_id: WindowId) -> PlatformResult<PublishedState> {
        self.published
            .borrow()
            .get(&window_id)
            .copied()
            .ok_or(PlatformError::WindowNotFound(window_id))
    }

    pub(crate) fn with_window_data_write<R>(
        &self,
        window_id: WindowId,
        f: impl FnOnce(&mut NativeWindowData) -> PlatformResult<R>,
    ) -> PlatformResult<R> {
        let entry = self.entry(window_id)?;
        let mut data = entry.try_borrow_mut().map_err(|_| busy(window_id))?;
        let result = f(&mut *data);
        if let Some(published) = self.published.borrow_mut().get_mut(&window_id) {
            *published = PublishedState::of(&data);
        }
        result
    }
}

fn busy(window_id: WindowId) -> PlatformError {
    PlatformError::OperationFailed(format!("{window_id:?} is already executing a command"))
}

pub struct PlatformInterface {
    registry: WindowRegistry,
    config: ManagerConfig,
    factory: RefCell<Option<Box<dyn WindowFactory>>>,
    next_window_id: Cell<i64>,
}

impl PlatformInterface {
    pub fn new(config: ManagerConfig) -> Self {
        log::debug!("PlatformInterface: created with {config:?}");
        PlatformInterface {
            registry: WindowRegistry::default(),
            config,
            factory: RefCell::new(None),
            next_window_id: Cell::new(WindowId::MAIN.raw() + 1),
        }
    }

    pub fn with_factory(self, factory: impl WindowFactory + 'static) -> Self {
        self.set_factory(Some(Box::new(factory)));
        self
    }

    pub fn set_factory(&self, factory: Option<Box<dyn WindowFactory>>) {
        match self.factory.try_borrow_mut() {
            Ok(mut slot) => *slot = factory,
            Err(_) => log::warn!("PlatformInterface: factory replaced while in use, ignored."),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Registers the host's own top-level window.
    pub fn attach_main_window(&self, native: Box<dyn NativeWindow>) -> WindowId {
        self.registry
            .insert(NativeWindowData::new(WindowId::MAIN, native));
        WindowId::MAIN
    }

    /*
     * Allocates the next id and asks the factory for the window. Without a
     * factory no id is consumed and `WindowId::INVALID` comes back; a factory
     * error is passed on to the caller.
     */
    pub fn create_window(&self, args: &[String]) -> PlatformResult<WindowId> {
        let mut factory = self.factory.try_borrow_mut().map_err(|_| {
            PlatformError::OperationFailed("createWindow called from inside the factory".into())
        })?;
        let Some(factory) = factory.as_mut() else {
            log::warn!("PlatformInterface: createWindow without a window factory.");
            return Ok(WindowId::INVALID);
        };

        let window_id = WindowId::new(self.next_window_id.get());
        self.next_window_id.set(window_id.raw() + 1);

        let mut factory_args = Vec::with_capacity(args.len() + 1);
        factory_args.push(window_id.raw().to_string());
        factory_args.extend_from_slice(args);

        let native = factory.create_window(&factory_args)?;
        self.registry.insert(NativeWindowData::new(window_id, native));
        log::debug!("PlatformInterface: created window {window_id:?}.");
        Ok(window_id)
    }

    /// Drops the window's state. Its AppBar registration is removed first.
    pub fn remove_window(&self, window_id: WindowId) -> bool {
        let Some(entry) = self.registry.remove(window_id) else {
            return false;
        };
        match entry.try_borrow_mut() {
            Ok(mut data) => {
                let (native, appbar) = data.appbar_mut();
                if appbar_handler::undock(native, appbar) {
                    log::debug!("PlatformInterface: dropped AppBar registration of {window_id:?}.");
                }
            }
            Err(_) => log::warn!(
                "PlatformInterface: {window_id:?} removed mid-command, AppBar left to the command."
            ),
        }
        true
    }

    pub fn has_window(&self, window_id: WindowId) -> bool {
        self.registry.contains(window_id)
    }

    /*
     * Dispatches one method-channel call. Setters reply with `null`; getters
     * reply with the queried value.
     */
    pub fn handle_method_call(
        &self,
        window_id: WindowId,
        method: &str,
        args: &Value,
    ) -> PlatformResult<Value> {
        if method == "createWindow" {
            let args = commands::create_window_args(args)?;
            return self.create_window(&args).map(|id| Value::from(id.raw()));
        }
        let command = WindowCommand::from_method_call(method, args)?;
        log::debug!("PlatformInterface: {method} on {window_id:?}");
        self.registry.with_window_data_write(window_id, |data| {
            command_executor::execute_command(data, &self.config, command)
        })
    }

    /// Limits to apply when the OS asks for the window's sizing constraints.
    /// Safe to call while a command on the same window is running.
    pub fn track_size_limits(&self, window_id: WindowId) -> PlatformResult<TrackSizeLimits> {
        self.registry
            .published(window_id)
            .map(|published| published.size_limits)
    }

    /// Whether a close request for the window should be vetoed.
    pub fn is_prevent_close(&self, window_id: WindowId) -> PlatformResult<bool> {
        self.registry
            .published(window_id)
            .map(|published| published.prevent_close)
    }
}
