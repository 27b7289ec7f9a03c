use crate::config::{WORKER_SCRIPT, default_worker_program};

use std::path::Path;

use serde::{Deserialize, Serialize};
use voice_typer_core::worker::WorkerSpec;

/// How to launch the transcription worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Interpreter or executable.
    #[serde(default = "default_worker_program")]
    pub program: String,

    /// Arguments, normally the worker script path.
    #[serde(default)]
    pub args: Vec<String>,
}

impl WorkerConfig {
    /// Default launch line for a worker script installed in `data_dir`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self {
            program: default_worker_program(),
            args: vec![data_dir.join(WORKER_SCRIPT).to_string_lossy().into_owned()],
        }
    }

    /// Launch line for the supervisor.
    pub fn spec(&self) -> WorkerSpec {
        WorkerSpec::new(self.program.clone(), self.args.clone())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            program: default_worker_program(),
            args: vec![WORKER_SCRIPT.to_string()],
        }
    }
}
