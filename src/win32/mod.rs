mod shell;
mod system;
mod window;

pub use window::Win32Window;
