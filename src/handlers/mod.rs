pub mod appbar_handler;
pub mod chrome_handler;
pub mod fullscreen_handler;
pub mod placement_handler;
pub mod progress_handler;
