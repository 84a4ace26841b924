//! The application start orchestrator.
//!
//! [`start_application`] drives one application through the platform's
//! deploy lifecycle: it issues the "start" mutation, then polls the control
//! plane through two phases (staging, then instance startup) while a
//! log-tailing connection streams the application's output. Everything the
//! run produces fans into the four channels of [`StartStreams`].
//!
//! # Concurrency
//!
//! Three tasks cooperate, communicating only through channels: the
//! sequential phase-poll driver, the log-event drain, and the log-error
//! drain. The drains live for the whole run, independent of which phase
//! the driver is in. The driver's sleep between polls is the only
//! intentional blocking wait.
//!
//! # Shutdown
//!
//! On the first terminal condition the driver closes the log tailer, waits
//! for both drains to observe the tail channels closing and finish
//! forwarding, and only then lets the public channels close - messages and
//! log errors last, so the caller never sees a close followed by a send.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::domain::{Application, ApplicationPatch, ApplicationState, LogMessage, Warnings};
use crate::error::{ActionError, LogStreamError};
use crate::port::{ControlPlaneClient, LogTailer, StartPolicy};

use super::poll::{
    phase_expired, staging_verdict, startup_verdict, StagingVerdict, StartupVerdict,
};

const LOG_CHANNEL_BUFFER: usize = 64;
const WARNING_CHANNEL_BUFFER: usize = 16;

/// The four output channels of one start run.
///
/// All four close together when the run reaches a terminal state. Per
/// channel, delivery order matches production order; no ordering holds
/// between different channels.
#[derive(Debug)]
pub struct StartStreams {
    /// Log events, forwarded verbatim from the tailing connection.
    pub messages: mpsc::Receiver<LogMessage>,
    /// Transport errors of the tailing connection; never terminal.
    pub log_errors: mpsc::Receiver<LogStreamError>,
    /// Advisory warnings, in the order the underlying calls completed.
    pub warnings: mpsc::Receiver<String>,
    /// The terminal error, at most one per run.
    pub errors: mpsc::Receiver<ActionError>,
}

/// Start an application and follow it until it is staged and every
/// instance runs, or until the first terminal failure.
///
/// Returns immediately; the orchestration proceeds concurrently with the
/// caller, which observes it exclusively through the returned channels.
/// The tailer is exclusively owned by this run and is closed exactly once
/// on every exit path. Must be called from within a tokio runtime.
pub fn start_application<C, T, P>(
    client: Arc<C>,
    app: &Application,
    tailer: Arc<T>,
    policy: Arc<P>,
) -> StartStreams
where
    C: ControlPlaneClient + ?Sized + 'static,
    T: LogTailer + ?Sized + 'static,
    P: StartPolicy + ?Sized + 'static,
{
    let (message_tx, message_rx) = mpsc::channel(LOG_CHANNEL_BUFFER);
    let (log_error_tx, log_error_rx) = mpsc::channel(LOG_CHANNEL_BUFFER);
    let (warning_tx, warning_rx) = mpsc::channel(WARNING_CHANNEL_BUFFER);
    let (error_tx, error_rx) = mpsc::channel(1);

    tokio::spawn(run(
        client,
        app.clone(),
        tailer,
        policy,
        message_tx,
        log_error_tx,
        warning_tx,
        error_tx,
    ));

    StartStreams {
        messages: message_rx,
        log_errors: log_error_rx,
        warnings: warning_rx,
        errors: error_rx,
    }
}

#[allow(clippy::too_many_arguments)]
async fn run<C, T, P>(
    client: Arc<C>,
    app: Application,
    tailer: Arc<T>,
    policy: Arc<P>,
    message_tx: mpsc::Sender<LogMessage>,
    log_error_tx: mpsc::Sender<LogStreamError>,
    warning_tx: mpsc::Sender<String>,
    error_tx: mpsc::Sender<ActionError>,
) where
    C: ControlPlaneClient + ?Sized + 'static,
    T: LogTailer + ?Sized + 'static,
    P: StartPolicy + ?Sized + 'static,
{
    info!(app = %app.guid, name = %app.name, "Starting application");

    let patch = ApplicationPatch::new(app.guid.clone()).with_state(ApplicationState::Started);
    let (warnings, trigger) = client.update_application(patch).await;
    forward_warnings(&warning_tx, warnings).await;

    if let Err(err) = trigger {
        // The one path that never polls and never tails logs.
        let _ = error_tx.send(err.into()).await;
        close_tailer(tailer.as_ref()).await;
        return;
    }

    let (events, transport_errors) = tailer.tail(&app.guid, &policy.access_token()).await;
    let message_drain = tokio::spawn(drain(events, message_tx.clone()));
    let log_error_drain = tokio::spawn(drain(transport_errors, log_error_tx.clone()));

    if let Err(err) = drive_phases(client.as_ref(), &app, policy.as_ref(), &warning_tx).await {
        let _ = error_tx.send(err).await;
    }

    // Closing the tailer closes both tail channels; the drains observe
    // those closures and finish forwarding whatever is still in flight.
    close_tailer(tailer.as_ref()).await;
    let _ = message_drain.await;
    let _ = log_error_drain.await;

    drop(warning_tx);
    drop(error_tx);
    // message_tx and log_error_tx drop here, closing messages and
    // log_errors last.
}

async fn drive_phases<C, P>(
    client: &C,
    app: &Application,
    policy: &P,
    warning_tx: &mpsc::Sender<String>,
) -> Result<(), ActionError>
where
    C: ControlPlaneClient + ?Sized,
    P: StartPolicy + ?Sized,
{
    let staged = poll_staging(client, app, policy, warning_tx).await?;
    debug!(app = %staged.guid, instances = staged.instances, "Staging complete");
    poll_startup(client, &staged, policy, warning_tx).await
}

/// Poll the application record until its package leaves the pending state.
///
/// The timeout is read once at phase entry and checked before every fetch,
/// so a zero timeout expires without a single call.
async fn poll_staging<C, P>(
    client: &C,
    app: &Application,
    policy: &P,
    warning_tx: &mpsc::Sender<String>,
) -> Result<Application, ActionError>
where
    C: ControlPlaneClient + ?Sized,
    P: StartPolicy + ?Sized,
{
    let timeout = policy.staging_timeout();
    let entered = Instant::now();

    loop {
        if phase_expired(entered.elapsed(), timeout) {
            return Err(ActionError::StagingTimeout {
                name: app.name.clone(),
            });
        }

        let (warnings, result) = client.get_application(&app.guid).await;
        forward_warnings(warning_tx, warnings).await;
        let snapshot = result?;

        match staging_verdict(&snapshot) {
            StagingVerdict::Completed => return Ok(snapshot),
            StagingVerdict::Failed { reason } => {
                return Err(ActionError::StagingFailed { reason })
            }
            StagingVerdict::InProgress => sleep(policy.polling_interval()).await,
        }
    }
}

/// Poll instance snapshots until every instance runs or one fails hard.
async fn poll_startup<C, P>(
    client: &C,
    app: &Application,
    policy: &P,
    warning_tx: &mpsc::Sender<String>,
) -> Result<(), ActionError>
where
    C: ControlPlaneClient + ?Sized,
    P: StartPolicy + ?Sized,
{
    let timeout = policy.startup_timeout();
    let entered = Instant::now();

    loop {
        if phase_expired(entered.elapsed(), timeout) {
            return Err(ActionError::StartupTimeout {
                name: app.name.clone(),
            });
        }

        let (warnings, result) = client.get_application_instances(&app.guid).await;
        forward_warnings(warning_tx, warnings).await;
        let snapshot = result?;

        match startup_verdict(&snapshot) {
            StartupVerdict::AllRunning => {
                info!(app = %app.guid, instances = snapshot.len(), "All instances running");
                return Ok(());
            }
            StartupVerdict::Crashed => {
                return Err(ActionError::InstanceCrashed {
                    name: app.name.clone(),
                })
            }
            StartupVerdict::Flapping => {
                return Err(ActionError::InstanceFlapping {
                    name: app.name.clone(),
                })
            }
            StartupVerdict::InProgress => sleep(policy.polling_interval()).await,
        }
    }
}

/// Forward one call's warnings, preserving their order.
async fn forward_warnings(warning_tx: &mpsc::Sender<String>, warnings: Warnings) {
    for warning in warnings {
        if warning_tx.send(warning).await.is_err() {
            return;
        }
    }
}

/// Pump one tail channel into its public counterpart until the tail side
/// closes or the caller stops listening.
async fn drain<T>(mut source: mpsc::Receiver<T>, sink: mpsc::Sender<T>) {
    while let Some(item) = source.recv().await {
        if sink.send(item).await.is_err() {
            break;
        }
    }
}

async fn close_tailer<T: LogTailer + ?Sized>(tailer: &T) {
    if let Err(err) = tailer.close().await {
        debug!(error = %err, "Closing the log tailer failed");
    }
}
