/*
 * Host-supplied settings for the window manager. Everything has a default
 * that matches a stock embedding, so hosts only pass the keys they change.
 */
use serde::Deserialize;

use crate::error::Result as PlatformResult;

const WM_USER: u32 = 0x0400;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManagerConfig {
    /// Class name of the child view that hosts the rendered content.
    pub content_view_class: String,
    /// Message id the shell uses for AppBar notifications.
    pub appbar_callback_message: u32,
    /// DPI assumed when the monitor DPI cannot be queried.
    pub default_dpi: u32,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            content_view_class: "FLUTTERVIEW".to_string(),
            appbar_callback_message: WM_USER + 0x01,
            default_dpi: 96,
        }
    }
}

impl ManagerConfig {
    pub fn from_json_str(json: &str) -> PlatformResult<Self> {
        let config: ManagerConfig = serde_json::from_str(json)?;
        log::debug!("ManagerConfig: loaded {config:?}");
        Ok(config)
    }

    pub(crate) fn fallback_dpi(&self) -> u32 {
        if self.default_dpi == 0 {
            96
        } else {
            self.default_dpi
        }
    }
}
