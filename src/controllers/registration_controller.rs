//! Provider registration controller
//!
//! Watches the operator's own Deployment and registers the MyDB Cloud provider
//! with the DBaaS operator once the Deployment has been created.

use std::sync::Arc;
use std::time::Duration;

use futures::{future, stream, StreamExt, TryStreamExt};
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    runtime::{
        controller::{Action, Controller},
        reflector, watcher,
        watcher::Config as WatcherConfig,
        WatchStreamExt,
    },
    Api, Client, ResourceExt,
};
use tracing::{debug, error, info, instrument};

use crate::controllers::admission::AdmissionFilter;
use crate::controllers::notification::NotificationClassifier;
use crate::controllers::{Context, RequeueBackoff};
use crate::error::{Error, Result};
use crate::metrics;
use crate::reconcilers::registration::{self, Outcome, WorkloadRef};

/// Metric label for this controller
const KIND: &str = "DBaaSProvider";

/// Shortest retry delay when the installation is misconfigured
const FATAL_RETRY: Duration = Duration::from_secs(300);

/// Run the provider registration controller
pub async fn run(client: Client, context: Arc<Context>) {
    let deployments: Api<Deployment> =
        Api::namespaced(client, &context.config.install_namespace);
    let (reader, writer) = reflector::store();

    let filter = AdmissionFilter::installation(context.config.clone());
    let mut classifier = NotificationClassifier::default();
    let admitted = watcher(deployments, WatcherConfig::default())
        .default_backoff()
        .reflect(writer)
        .map_ok(move |event| {
            stream::iter(
                classifier
                    .classify(event)
                    .into_iter()
                    .map(Ok::<_, watcher::Error>),
            )
        })
        .try_flatten()
        .try_filter_map(move |notification| {
            let admitted = filter.admit(&notification);
            debug!(
                name = %notification.object().name_any(),
                admitted,
                "Deployment notification"
            );
            future::ready(Ok(admitted.then(|| notification.into_object())))
        });

    info!(
        namespace = %context.config.install_namespace,
        "Starting provider registration controller"
    );

    Controller::for_stream(admitted, reader)
        .shutdown_on_signal()
        .run(reconcile, error_policy, context)
        .for_each(|result| async move {
            match result {
                Ok((obj, action)) => {
                    info!(
                        name = %obj.name,
                        namespace = obj.namespace.as_deref().unwrap_or("default"),
                        ?action,
                        "Reconciled operator Deployment"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Reconciliation error");
                    metrics::RECONCILIATION_ERRORS.with_label_values(&[KIND]).inc();
                }
            }
        })
        .await;
}

/// Main reconciliation function
#[instrument(skip(deployment, ctx), fields(name = %deployment.name_any(), namespace = deployment.namespace()))]
async fn reconcile(deployment: Arc<Deployment>, ctx: Arc<Context>) -> Result<Action> {
    let _timer = metrics::RECONCILE_DURATION
        .with_label_values(&[KIND])
        .start_timer();
    metrics::RECONCILIATIONS.with_label_values(&[KIND]).inc();

    let workload = WorkloadRef::from_deployment(&deployment, &ctx.config);
    let key = workload.to_string();

    let outcome = registration::reconcile(&ctx.control_plane, &ctx.config, &workload).await;
    metrics::RECONCILE_OUTCOMES
        .with_label_values(&[outcome.label()])
        .inc();

    if let Outcome::Created { name } = &outcome {
        metrics::PROVIDERS_CREATED.inc();
        info!(name = %name, "Registered MyDB Cloud provider");
    }
    action_for(outcome, &ctx.backoff, &key)
}

/// Map a reconciliation outcome to the controller's next action
///
/// Settled outcomes clear the key's backoff; waiting for the DBaaS API grows it.
fn action_for(outcome: Outcome, backoff: &RequeueBackoff, key: &str) -> Result<Action> {
    match outcome {
        Outcome::NoOp | Outcome::Created { .. } => {
            backoff.reset(key);
            Ok(Action::await_change())
        }
        Outcome::RequeueRequested => {
            let delay = backoff.next_delay(key);
            info!(delay_secs = delay.as_secs(), "Waiting for DBaaSProvider API");
            Ok(Action::requeue(delay))
        }
        Outcome::Retryable(e) | Outcome::Fatal(e) => Err(e),
    }
}

/// Delay before retrying a failed reconciliation
///
/// Errors share the key's exponential backoff; misconfiguration never retries
/// sooner than [`FATAL_RETRY`].
fn retry_delay(error: &Error, backoff: &RequeueBackoff, key: &str) -> Duration {
    let delay = backoff.next_delay(key);
    if error.is_fatal() {
        delay.max(FATAL_RETRY)
    } else {
        delay
    }
}

/// Error policy for the controller
fn error_policy(deployment: Arc<Deployment>, error: &Error, ctx: Arc<Context>) -> Action {
    let key = WorkloadRef::from_deployment(&deployment, &ctx.config).to_string();
    let delay = retry_delay(error, &ctx.backoff, &key);
    error!(
        name = %deployment.name_any(),
        error = %error,
        fatal = error.is_fatal(),
        delay_secs = delay.as_secs(),
        "Reconciliation failed, scheduling retry"
    );

    Action::requeue(delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::{BACKOFF_BASE, BACKOFF_MAX};
    use kube::core::ErrorResponse;

    const KEY: &str = "mydb-system/mydb-controller-manager";

    fn server_error() -> Error {
        Error::Kube(kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "internal error".to_string(),
            reason: "InternalError".to_string(),
            code: 500,
        }))
    }

    fn no_owners() -> Error {
        Error::NoOwnerCandidates {
            selector: "olm.owner=mydb-operator.v0.1.0".to_string(),
        }
    }

    #[test]
    fn waiting_for_api_requeues_with_growing_delay() {
        let backoff = RequeueBackoff::default();

        let delays: Vec<Action> = (0..3)
            .map(|_| action_for(Outcome::RequeueRequested, &backoff, KEY).unwrap())
            .collect();

        assert_eq!(
            delays,
            vec![
                Action::requeue(Duration::from_secs(30)),
                Action::requeue(Duration::from_secs(60)),
                Action::requeue(Duration::from_secs(120)),
            ]
        );
    }

    #[test]
    fn settled_outcomes_await_change_and_reset_backoff() {
        let backoff = RequeueBackoff::default();
        action_for(Outcome::RequeueRequested, &backoff, KEY).unwrap();
        action_for(Outcome::RequeueRequested, &backoff, KEY).unwrap();

        let action = action_for(
            Outcome::Created {
                name: "mydb-cloud-registration".to_string(),
            },
            &backoff,
            KEY,
        )
        .unwrap();
        assert_eq!(action, Action::await_change());
        assert_eq!(
            action_for(Outcome::RequeueRequested, &backoff, KEY).unwrap(),
            Action::requeue(BACKOFF_BASE)
        );

        action_for(Outcome::NoOp, &backoff, KEY).unwrap();
        assert_eq!(backoff.next_delay(KEY), BACKOFF_BASE);
    }

    #[test]
    fn errors_are_handed_to_the_error_policy() {
        let backoff = RequeueBackoff::default();

        let retryable = action_for(Outcome::Retryable(server_error()), &backoff, KEY);
        let fatal = action_for(Outcome::Fatal(no_owners()), &backoff, KEY);

        assert!(matches!(retryable, Err(ref e) if !e.is_fatal()));
        assert!(matches!(fatal, Err(ref e) if e.is_fatal()));
        assert_eq!(backoff.next_delay(KEY), BACKOFF_BASE);
    }

    #[test]
    fn transient_errors_back_off_to_the_ceiling() {
        let backoff = RequeueBackoff::default();
        let err = server_error();

        let delays: Vec<u64> = (0..8)
            .map(|_| retry_delay(&err, &backoff, KEY).as_secs())
            .collect();

        assert_eq!(delays, vec![30, 60, 120, 240, 480, 960, 1800, 1800]);
        assert_eq!(retry_delay(&err, &backoff, KEY), BACKOFF_MAX);
    }

    #[test]
    fn fatal_errors_wait_at_least_the_fatal_floor() {
        let backoff = RequeueBackoff::default();
        let err = no_owners().at(crate::error::Step::ListOwners);

        assert_eq!(retry_delay(&err, &backoff, KEY), FATAL_RETRY);
        for _ in 0..10 {
            retry_delay(&err, &backoff, KEY);
        }
        assert_eq!(retry_delay(&err, &backoff, KEY), BACKOFF_MAX);
    }
}
