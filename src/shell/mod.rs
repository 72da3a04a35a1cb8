//! Shell command execution and environment lookup.

pub mod command;
pub mod paths;
pub mod platform;

pub use command::{execute, execute_check, execute_required, CommandOptions, CommandResult};
pub use paths::{augment_path, is_executable, parse_system_path, resolve_tool_path};
pub use platform::{default_profile_path, expand_home, home_dir, is_ci, ShellType};
