//! Start orchestration tests.
//!
//! Driven entirely through the scripted testkit doubles under paused tokio
//! time, so interval sleeps and phase timeouts resolve deterministically.

mod support;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use skylift::domain::{
    AppGuid, ApplicationPatch, ApplicationState, InstanceSnapshot, InstanceState, LogMessage,
    MessageKind,
};
use skylift::error::{ActionError, ClientError, LogStreamError};
use skylift::runtime::{start_application, StartStreams};
use skylift::testkit::{fail, ok, ChannelLogTailer, ScriptedControlPlane, StaticPolicy};

use support::app::{failed_app, make_app, pending_app, staged_app};
use support::instances::snapshot;

const GUID: &str = "some-app-guid";
const NAME: &str = "some-app";

fn start(
    client: &Arc<ScriptedControlPlane>,
    tailer: &Arc<ChannelLogTailer>,
    policy: &Arc<StaticPolicy>,
) -> StartStreams {
    start_application(
        Arc::clone(client),
        &make_app(GUID, NAME),
        Arc::clone(tailer),
        Arc::clone(policy),
    )
}

async fn drain_channel<T>(rx: &mut mpsc::Receiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Some(item) = rx.recv().await {
        items.push(item);
    }
    items
}

fn make_log(message: &str) -> LogMessage {
    LogMessage {
        message: message.into(),
        kind: MessageKind::Out,
        timestamp: chrono::Utc::now(),
        source_type: "APP".into(),
        source_instance: "0".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn starts_and_polls_until_every_instance_runs() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"]))
            .with_get_application(ok(pending_app(GUID, NAME), &["app-warnings-1"]))
            .with_get_application(ok(staged_app(GUID, NAME, 2), &["app-warnings-2"]))
            .with_instances(ok(
                snapshot(&[InstanceState::Starting, InstanceState::Starting]),
                &["app-instance-warnings-1"],
            ))
            .with_instances(ok(
                snapshot(&[InstanceState::Starting, InstanceState::Running]),
                &["app-instance-warnings-2"],
            ))
            .with_instances(ok(
                snapshot(&[InstanceState::Running, InstanceState::Running]),
                &["app-instance-warnings-3"],
            )),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        [
            "update-warning",
            "app-warnings-1",
            "app-warnings-2",
            "app-instance-warnings-1",
            "app-instance-warnings-2",
            "app-instance-warnings-3",
        ]
    );
    assert!(drain_channel(&mut streams.errors).await.is_empty());
    assert!(drain_channel(&mut streams.messages).await.is_empty());
    assert!(drain_channel(&mut streams.log_errors).await.is_empty());

    assert_eq!(
        client.update_patches(),
        [ApplicationPatch::new(AppGuid::new(GUID)).with_state(ApplicationState::Started)]
    );
    assert_eq!(client.get_application_calls(), 2);
    assert_eq!(client.get_instances_calls(), 3);
    assert_eq!(client.fetched_guids(), [AppGuid::new(GUID), AppGuid::new(GUID)]);

    assert_eq!(policy.staging_timeout_reads(), 1);
    assert_eq!(policy.startup_timeout_reads(), 1);
    assert_eq!(policy.polling_interval_reads(), 3);

    assert_eq!(tailer.tail_calls(), 1);
    assert_eq!(tailer.close_calls(), 1);
    assert_eq!(
        tailer.tail_requests(),
        [(AppGuid::new(GUID), "some-access-token".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn trigger_failure_sends_the_error_and_never_polls_or_tails() {
    let client = Arc::new(ScriptedControlPlane::new().with_update_application(fail(
        ClientError::Other("I am a banana!!!!".into()),
        &["update-warning"],
    )));
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(drain_channel(&mut streams.warnings).await, ["update-warning"]);
    let errors = drain_channel(&mut streams.errors).await;
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "I am a banana!!!!");
    assert!(drain_channel(&mut streams.messages).await.is_empty());
    assert!(drain_channel(&mut streams.log_errors).await.is_empty());

    assert_eq!(client.get_application_calls(), 0);
    assert_eq!(client.get_instances_calls(), 0);
    assert_eq!(policy.polling_interval_reads(), 0);
    assert_eq!(tailer.tail_calls(), 0);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn staging_fetch_error_stops_polling_after_its_warnings() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"]))
            .with_get_application(fail(
                ClientError::Other("I am a banana!!!!".into()),
                &["app-warnings-1"],
            )),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        ["update-warning", "app-warnings-1"]
    );
    let errors = drain_channel(&mut streams.errors).await;
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ActionError::Client(_)));

    assert_eq!(client.get_application_calls(), 1);
    assert_eq!(client.get_instances_calls(), 0);
    assert_eq!(policy.polling_interval_reads(), 0);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn staging_failure_carries_the_platform_reason() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"]))
            .with_get_application(ok(failed_app(GUID, NAME, "OhNoes"), &["app-warnings-1"])),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        ["update-warning", "app-warnings-1"]
    );
    let errors = drain_channel(&mut streams.errors).await;
    assert!(
        matches!(&errors[..], [ActionError::StagingFailed { reason }] if reason == "OhNoes")
    );

    assert_eq!(client.get_application_calls(), 1);
    assert_eq!(client.get_instances_calls(), 0);
    assert_eq!(policy.staging_timeout_reads(), 1);
    assert_eq!(policy.polling_interval_reads(), 0);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_staging_timeout_expires_before_any_fetch() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"])),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new().with_staging_timeout(Duration::ZERO));

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(drain_channel(&mut streams.warnings).await, ["update-warning"]);
    let errors = drain_channel(&mut streams.errors).await;
    assert!(matches!(&errors[..], [ActionError::StagingTimeout { name }] if name == NAME));

    assert_eq!(client.get_application_calls(), 0);
    assert_eq!(client.get_instances_calls(), 0);
    assert_eq!(policy.staging_timeout_reads(), 1);
    assert_eq!(policy.polling_interval_reads(), 0);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn staging_times_out_between_polls_without_another_fetch() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &[]))
            .with_get_application(ok(pending_app(GUID, NAME), &["app-warnings-1"]))
            .with_get_application(ok(pending_app(GUID, NAME), &["app-warnings-2"])),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    // Two polls fit into the budget; the third check finds it spent.
    let policy = Arc::new(
        StaticPolicy::new()
            .with_staging_timeout(Duration::from_secs(15))
            .with_polling_interval(Duration::from_secs(10)),
    );

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        ["app-warnings-1", "app-warnings-2"]
    );
    let errors = drain_channel(&mut streams.errors).await;
    assert!(matches!(&errors[..], [ActionError::StagingTimeout { name }] if name == NAME));

    assert_eq!(client.get_application_calls(), 2);
    assert_eq!(policy.polling_interval_reads(), 2);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn startup_fetch_error_stops_polling_after_its_warnings() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"]))
            .with_get_application(ok(pending_app(GUID, NAME), &["app-warnings-1"]))
            .with_get_application(ok(staged_app(GUID, NAME, 2), &["app-warnings-2"]))
            .with_instances(fail(
                ClientError::Other("I am a banana!!!!".into()),
                &["app-instance-warnings-1"],
            )),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        [
            "update-warning",
            "app-warnings-1",
            "app-warnings-2",
            "app-instance-warnings-1",
        ]
    );
    let errors = drain_channel(&mut streams.errors).await;
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ActionError::Client(_)));

    assert_eq!(client.get_instances_calls(), 1);
    assert_eq!(policy.polling_interval_reads(), 1);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn zero_startup_timeout_expires_before_any_instance_fetch() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"]))
            .with_get_application(ok(pending_app(GUID, NAME), &["app-warnings-1"]))
            .with_get_application(ok(staged_app(GUID, NAME, 2), &["app-warnings-2"])),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new().with_startup_timeout(Duration::ZERO));

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        ["update-warning", "app-warnings-1", "app-warnings-2"]
    );
    let errors = drain_channel(&mut streams.errors).await;
    assert!(matches!(&errors[..], [ActionError::StartupTimeout { name }] if name == NAME));

    assert_eq!(client.get_instances_calls(), 0);
    assert_eq!(policy.startup_timeout_reads(), 1);
    assert_eq!(policy.polling_interval_reads(), 1);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn a_crashed_instance_fails_the_run_even_alongside_running_ones() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"]))
            .with_get_application(ok(staged_app(GUID, NAME, 2), &["app-warnings-1"]))
            .with_instances(ok(
                snapshot(&[InstanceState::Running, InstanceState::Crashed]),
                &["app-instance-warnings-1"],
            )),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        ["update-warning", "app-warnings-1", "app-instance-warnings-1"]
    );
    let errors = drain_channel(&mut streams.errors).await;
    assert!(matches!(&errors[..], [ActionError::InstanceCrashed { name }] if name == NAME));

    // Polling stops at the first terminal snapshot.
    assert_eq!(client.get_instances_calls(), 1);
    assert_eq!(policy.startup_timeout_reads(), 1);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn a_flapping_instance_fails_the_run() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"]))
            .with_get_application(ok(staged_app(GUID, NAME, 1), &["app-warnings-1"]))
            .with_instances(ok(
                snapshot(&[InstanceState::Flapping]),
                &["app-instance-warnings-1"],
            )),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        ["update-warning", "app-warnings-1", "app-instance-warnings-1"]
    );
    let errors = drain_channel(&mut streams.errors).await;
    assert!(matches!(&errors[..], [ActionError::InstanceFlapping { name }] if name == NAME));

    assert_eq!(client.get_instances_calls(), 1);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn an_application_without_instances_starts_immediately() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &[]))
            .with_get_application(ok(staged_app(GUID, NAME, 0), &[]))
            .with_instances(ok(InstanceSnapshot::new(), &[])),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    assert!(drain_channel(&mut streams.errors).await.is_empty());
    assert_eq!(client.get_instances_calls(), 1);
    assert_eq!(tailer.close_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn forwards_log_messages_and_transport_errors_while_polling() {
    let client = Arc::new(
        ScriptedControlPlane::new()
            .with_update_application(ok(make_app(GUID, NAME), &["update-warning"]))
            .with_get_application(ok(pending_app(GUID, NAME), &["app-warnings-1"]))
            .with_get_application(ok(staged_app(GUID, NAME, 1), &["app-warnings-2"]))
            .with_instances(ok(snapshot(&[InstanceState::Running]), &[])),
    );
    let tailer = Arc::new(ChannelLogTailer::new());
    let policy = Arc::new(StaticPolicy::new());

    let mut streams = start(&client, &tailer, &policy);

    // Once the first staging-poll warning arrives the tail is open, so
    // emissions from here on are guaranteed to be forwarded.
    assert_eq!(streams.warnings.recv().await.as_deref(), Some("update-warning"));
    assert_eq!(streams.warnings.recv().await.as_deref(), Some("app-warnings-1"));

    tailer.emit(make_log("Hello from the app")).await;
    tailer
        .emit_error(LogStreamError::Connection("stream hiccup".into()))
        .await;

    let message = streams.messages.recv().await.expect("a log message");
    assert_eq!(message.message, "Hello from the app");

    let log_error = streams.log_errors.recv().await.expect("a log error");
    assert!(matches!(log_error, LogStreamError::Connection(_)));

    assert_eq!(
        drain_channel(&mut streams.warnings).await,
        ["app-warnings-2"]
    );
    assert!(drain_channel(&mut streams.errors).await.is_empty());

    // The tailer was closed, so both log channels drain to closure.
    assert!(drain_channel(&mut streams.messages).await.is_empty());
    assert!(drain_channel(&mut streams.log_errors).await.is_empty());
    assert_eq!(tailer.close_calls(), 1);
}
