//! Command-driven service runtime (`docker info` / `open -a Docker`).

use std::path::PathBuf;

use crate::backends::ServiceRuntime;
use crate::error::Result;
use crate::shell::{execute_check, execute_required, CommandOptions};

/// Starts services and checks readiness by running shell commands.
#[derive(Debug, Clone)]
pub struct CommandServiceRuntime {
    search_path: Vec<PathBuf>,
}

impl CommandServiceRuntime {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        Self { search_path }
    }
}

impl ServiceRuntime for CommandServiceRuntime {
    fn is_running(&self, check: &str) -> bool {
        execute_check(check, &self.search_path, None)
    }

    fn start(&self, start: &str) -> Result<()> {
        tracing::info!("Starting service: {}", start);
        execute_required(start, &CommandOptions::on_path(&self.search_path))?;
        Ok(())
    }
}
