// # callsign - public IP change reporter
//
// This binary is a THIN integration layer. All pipeline logic lives in
// callsign-core; this file is responsible for:
// 1. Loading `.env` and reading configuration from environment variables
// 2. Initializing logging
// 3. Wiring the ipapi source, the file checkpoint and the Discord notifier
// 4. Running the pipeline once and mapping the result to an exit code
//
// Scheduling is external (cron, systemd timer, container scheduler).
//
// ## Configuration
//
// - `LOG_LEVEL`: Console log level (default: info)
// - `LOG_DISCORD_WEBHOOK_URL`: Optional webhook receiving log lines
// - `LOG_DISCORD_WEBHOOK_LEVEL`: Minimum level sent to the log webhook
// - `DEBUG`: Report every run as a change
// - `SIMPLE_MODE`: Only send the address field
// - `DISCORD_WEBHOOK_URL`: Notification webhook (unset = no notifications)
// - `CHECKPOINT_PATH`: Checkpoint file (default: checkpoint.txt)
//
// ## Example
//
// ```bash
// export DISCORD_WEBHOOK_URL=https://discord.com/api/webhooks/...
// export LOG_LEVEL=debug
//
// callsign
// ```

mod logging;

use callsign_core::checkpoint::FileCheckpointStore;
use callsign_core::{CallsignConfig, CallsignEngine, Error, RunOutcome};
use callsign_ip_ipapi::IpapiSource;
use callsign_notifier_discord::DiscordNotifier;
use std::process::ExitCode;
use tracing::{debug, error, info};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Normal run, nothing to report, or interrupted
/// - 1: Configuration or startup error
/// - 2: Runtime error (checkpoint write or delivery failed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallsignExitCode {
    /// Normal termination
    Clean = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<CallsignExitCode> for ExitCode {
    fn from(code: CallsignExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    // Load configuration from environment
    let config = match CallsignConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return CallsignExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        return CallsignExitCode::ConfigError.into();
    }

    let log_sink = match logging::init_logging(&config) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("{}", e);
            return CallsignExitCode::ConfigError.into();
        }
    };

    info!("Callsign");
    info!("https://github.com/EthanC/Callsign");

    if let Ok(path) = dotenv {
        info!("Loaded environment variables from {}", path.display());
    }
    debug!(
        debug = config.debug,
        simple_mode = config.simple_mode,
        notifications = config.notify_webhook_url.is_some(),
        checkpoint = %config.checkpoint_path.display(),
        "Configuration loaded"
    );

    // Single-threaded: one run, two network calls
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CallsignExitCode::RuntimeError.into();
        }
    };

    let engine = build_engine(&config);

    let code = rt.block_on(async {
        let code = tokio::select! {
            result = engine.run_once() => exit_code_for(&result),
            // Interrupted runs exit immediately and silently
            _ = wait_for_interrupt() => return CallsignExitCode::Clean,
        };

        if let Some(ref sink) = log_sink {
            sink.flush().await;
        }
        code
    });

    code.into()
}

/// Wire the production components into an engine
fn build_engine(config: &CallsignConfig) -> CallsignEngine {
    CallsignEngine::new(
        Box::new(IpapiSource::new()),
        Box::new(FileCheckpointStore::new(&config.checkpoint_path)),
        Box::new(DiscordNotifier::from_config(config)),
        config,
    )
}

/// Log the result of a run and choose the exit code
fn exit_code_for(result: &Result<RunOutcome, Error>) -> CallsignExitCode {
    match result {
        Ok(outcome) => {
            debug!("Run finished: {:?}", outcome);
            CallsignExitCode::Clean
        }
        Err(e) if e.is_nothing_to_report() => {
            error!("{}", e);
            debug!("Exiting, no IP address data to report");
            CallsignExitCode::Clean
        }
        Err(e) => {
            error!("Run failed: {}", e);
            CallsignExitCode::RuntimeError
        }
    }
}

/// Wait for SIGINT or SIGTERM
///
/// If the handlers cannot be installed the run is simply not interruptible
/// through this path; the default OS behavior still applies.
#[cfg(unix)]
async fn wait_for_interrupt() {
    let (Ok(mut sigterm), Ok(mut sigint)) = (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) else {
        return std::future::pending().await;
    };

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_interrupt() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callsign_core::IpRecord;
    use callsign_core::traits::Delivery;

    #[test]
    fn test_completed_runs_exit_cleanly() {
        let unchanged = Ok(RunOutcome::Unchanged {
            ip: "203.0.113.5".to_string(),
        });
        assert_eq!(exit_code_for(&unchanged), CallsignExitCode::Clean);

        let notified = Ok(RunOutcome::Notified {
            record: IpRecord::new("203.0.113.5"),
            previous_ip: None,
            delivery: Delivery::Disabled,
        });
        assert_eq!(exit_code_for(&notified), CallsignExitCode::Clean);
    }

    #[test]
    fn test_nothing_to_report_exits_cleanly() {
        assert_eq!(
            exit_code_for(&Err(Error::fetch("HTTP error: 429 Too Many Requests"))),
            CallsignExitCode::Clean
        );
        assert_eq!(
            exit_code_for(&Err(Error::comparison("Latest record has no IP address"))),
            CallsignExitCode::Clean
        );
    }

    #[test]
    fn test_run_failures_map_to_runtime_error() {
        assert_eq!(
            exit_code_for(&Err(Error::delivery("HTTP error: 500"))),
            CallsignExitCode::RuntimeError
        );
        assert_eq!(
            exit_code_for(&Err(Error::storage_write("read-only file system"))),
            CallsignExitCode::RuntimeError
        );
    }

    #[test]
    fn test_exit_code_values() {
        assert_eq!(CallsignExitCode::Clean as u8, 0);
        assert_eq!(CallsignExitCode::ConfigError as u8, 1);
        assert_eq!(CallsignExitCode::RuntimeError as u8, 2);
    }

    #[test]
    fn test_build_engine_from_defaults() {
        // Construction performs no I/O
        let _engine = build_engine(&CallsignConfig::default());
    }
}
