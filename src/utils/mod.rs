pub mod console;
pub mod environment;
pub mod logging;
pub mod paths;

pub use console::Console;
pub use environment::{current_user, get_app_dir, get_log_dir};
pub use logging::init_logging;
pub use paths::format_path_with_tilde;
