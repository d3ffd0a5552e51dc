//! Runner selection: in-process browser session or external worker.

use okofen_adapter_webdriver::WebDriverPanel;
use okofen_adapter_worker_process::WorkerProcessRunner;
use okofen_app::ports::{ModeRunner, RunError, RunOutput};
use okofen_app::services::session_lifecycle::SessionLifecycle;
use okofen_app::transcript::Transcript;
use okofen_domain::mode::Mode;

use crate::config::Config;

/// The runner the gateway drives, chosen from configuration.
pub enum CommandRunner {
    InProcess(SessionLifecycle<WebDriverPanel>),
    Worker(WorkerProcessRunner),
}

impl CommandRunner {
    /// Use the configured worker executable, or drive the panel directly
    /// when none is set.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        match &config.worker.path {
            Some(path) => Self::Worker(WorkerProcessRunner::new(
                path.clone(),
                config.worker.args.clone(),
            )),
            None => Self::InProcess(in_process(config)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InProcess(_) => "in_process",
            Self::Worker(_) => "worker",
        }
    }
}

/// Session lifecycle over a WebDriver-backed panel.
#[must_use]
pub fn in_process(config: &Config) -> SessionLifecycle<WebDriverPanel> {
    let step_timeout = config.appliance.step_timeout();
    SessionLifecycle::new(WebDriverPanel::new(config.appliance.clone()), step_timeout)
}

impl ModeRunner for CommandRunner {
    async fn run(&self, target: Mode, transcript: Transcript) -> Result<RunOutput, RunError> {
        match self {
            Self::InProcess(lifecycle) => lifecycle.run(target, transcript).await,
            Self::Worker(worker) => worker.run(target, transcript).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    #[test]
    fn should_run_in_process_without_worker_path() {
        let runner = CommandRunner::from_config(&Config::default());
        assert_eq!(runner.kind(), "in_process");
    }

    #[test]
    fn should_use_worker_when_path_is_configured() {
        let mut config = Config::default();
        config.worker.path = Some(PathBuf::from("/usr/local/bin/okofen-worker"));
        config.worker.args = vec!["--headless".to_string()];
        match CommandRunner::from_config(&config) {
            CommandRunner::Worker(worker) => {
                assert_eq!(worker.program(), Path::new("/usr/local/bin/okofen-worker"));
            }
            CommandRunner::InProcess(_) => panic!("expected a worker runner"),
        }
    }
}
