use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::commands::{parse_command, Command, HELP};
use crate::config::ClientConfig;
use crate::errors::AppError;
use crate::external::auth::AuthClient;
use crate::external::dashboard_api::DashboardApi;
use crate::external::fetcher::{build_http_client, HttpFetcher};
use crate::external::session::{Session, SessionEvent};
use crate::external::token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
use crate::services::clock::spawn_clock;
use crate::services::controller::{DashboardController, InitOutcome};
use crate::services::sink::DashboardSink;
use crate::state::AppState;

/// Consecutive re-logins without a successful start before giving up.
const MAX_RELOGIN_ATTEMPTS: u32 = 3;

pub fn create_app(config: ClientConfig, sink: Arc<dyn DashboardSink>) -> Result<AppState, AppError> {
    let tokens: Arc<dyn TokenStore> = match &config.token_file {
        Some(path) => {
            info!(path = %path.display(), "Using file token store");
            Arc::new(FileTokenStore::open(path))
        }
        None => Arc::new(MemoryTokenStore::new()),
    };
    let session = Session::new(tokens);

    let client = build_http_client(config.request_timeout())?;
    let fetcher = HttpFetcher::new(client.clone(), &config.base_url, session.clone())?;
    let auth = AuthClient::new(client, &config.base_url, session.clone())?;

    let controller = DashboardController::new(
        DashboardApi::new(Arc::new(fetcher)),
        sink.clone(),
        config.poll_interval(),
    );

    Ok(AppState {
        config,
        session,
        auth: Arc::new(auth),
        controller,
        sink,
    })
}

/// Logs in with configured credentials. `Ok(false)` when there are none to use.
pub async fn login(state: &AppState) -> Result<bool, AppError> {
    let Some((username, password)) = state.config.credentials() else {
        warn!("Login required but DASHBOARD_USERNAME / DASHBOARD_PASSWORD are not set");
        return Ok(false);
    };
    state.auth.login(&username, &password).await?;
    Ok(true)
}

/// Runs `init`. `None` means it failed and should be retried after a poll interval.
pub async fn start_dashboard(state: &AppState) -> Option<InitOutcome> {
    match state.controller.init().await {
        Ok(InitOutcome::Started) => {
            info!("🚀 Dashboard running against {}", state.config.base_url);
            Some(InitOutcome::Started)
        }
        Ok(outcome) => Some(outcome),
        Err(e) => {
            error!(error = %e, "Failed to initialize dashboard, retrying");
            None
        }
    }
}

/// What the run loop does after a login-required event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// A token is already back in place; the event was a duplicate.
    Skipped,
    Resumed,
    /// Login or `init` could not reach the backend.
    RetryStart,
    GiveUp,
}

/// Stops polling, logs in again and re-runs `init`.
///
/// `attempts` counts consecutive re-logins and is reset once the dashboard starts. Network
/// failures do not count against it.
pub async fn handle_login_required(state: &AppState, attempts: &mut u32) -> Recovery {
    if state.session.is_authenticated() {
        debug!("Session already restored, ignoring login-required event");
        return Recovery::Skipped;
    }

    state.controller.stop_polling();
    *attempts += 1;
    if *attempts > MAX_RELOGIN_ATTEMPTS {
        error!(attempts = *attempts - 1, "Giving up on re-login");
        return Recovery::GiveUp;
    }

    match login(state).await {
        Ok(true) => {}
        Ok(false) => return Recovery::GiveUp,
        Err(e) if e.is_network() => {
            warn!(error = %e, "Login server unreachable, retrying");
            *attempts -= 1;
            return Recovery::RetryStart;
        }
        Err(e) => {
            error!(error = %e, "Re-login failed");
            return Recovery::GiveUp;
        }
    }

    match start_dashboard(state).await {
        Some(InitOutcome::Started) => {
            *attempts = 0;
            Recovery::Resumed
        }
        // Rejected again: another login-required event is already queued.
        Some(InitOutcome::LoginRequired) => Recovery::Resumed,
        None => Recovery::RetryStart,
    }
}

async fn handle_command(state: &AppState, command: Command) -> bool {
    match command {
        Command::Save { stock1, stock2 } => {
            // Failures are already surfaced through the sink.
            if let Err(e) = state.controller.save_config(&stock1, &stock2).await {
                warn!(error = %e, "Config not saved");
            }
        }
        Command::Refresh => {
            let controller = state.controller.clone();
            tokio::spawn(async move {
                controller.fetch_and_render().await;
            });
        }
        Command::Logout => {
            // The stored token is gone; the next start goes through login again.
            state.controller.stop_polling();
            state.auth.logout();
            return false;
        }
        Command::Quit => return false,
        Command::Help => state.sink.notify(HELP),
        Command::Empty => {}
        Command::Unknown(verb) => state.sink.notify(&format!("unknown command '{}'; {}", verb, HELP)),
    }
    true
}

/// Runs until Ctrl-C, `quit`, or a session that cannot be restored.
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let mut session_events = state.session.subscribe();
    let clock = spawn_clock(state.sink.clone());

    if !state.session.is_authenticated() {
        match login(&state).await {
            Ok(true) => {}
            Ok(false) => {
                clock.abort();
                return Err(anyhow!("not logged in; set DASHBOARD_USERNAME and DASHBOARD_PASSWORD"));
            }
            // The retried init gets a 401 and goes through the re-login path.
            Err(e) if e.is_network() => warn!(error = %e, "Login server unreachable, retrying"),
            Err(e) => {
                clock.abort();
                return Err(e).context("login failed");
            }
        }
    }

    let mut relogin_attempts = 0u32;
    let retry = tokio::time::sleep(Duration::ZERO);
    tokio::pin!(retry);
    let mut retry_pending = false;
    if start_dashboard(&state).await.is_none() {
        retry.as_mut().reset(Instant::now() + state.config.poll_interval());
        retry_pending = true;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Ctrl-C received, shutting down");
                break;
            }
            _ = &mut retry, if retry_pending => {
                retry_pending = start_dashboard(&state).await.is_none();
                if retry_pending {
                    retry.as_mut().reset(Instant::now() + state.config.poll_interval());
                }
            }
            event = session_events.recv() => match event {
                Ok(SessionEvent::LoginRequired) => {
                    match handle_login_required(&state, &mut relogin_attempts).await {
                        Recovery::Skipped => {}
                        Recovery::Resumed => retry_pending = false,
                        Recovery::RetryStart => {
                            retry.as_mut().reset(Instant::now() + state.config.poll_interval());
                            retry_pending = true;
                        }
                        Recovery::GiveUp => break,
                    }
                }
                Ok(SessionEvent::LoggedIn) => {}
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Missed session events"),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if !handle_command(&state, parse_command(&line)).await {
                        break;
                    }
                }
                Ok(None) => {
                    info!("stdin closed, commands disabled");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin, commands disabled");
                    stdin_open = false;
                }
            },
        }
    }

    state.controller.stop_polling();
    clock.abort();
    Ok(())
}
