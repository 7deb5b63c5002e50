use tracing::Instrument;
use uuid::Uuid;

use crate::integrations::{Integration, OutcomeSet, SinkError};
use crate::models::SubmissionInput;
use crate::state::SharedState;

use super::metadata::RequestMetadata;

/// Forward a validated lead to every integration and report which ones failed.
///
/// Both calls run concurrently and neither can fail the other. Errors are
/// logged here and never returned; the caller only sees the outcome set.
pub async fn run(
    state: &SharedState,
    input: &SubmissionInput,
    meta: &RequestMetadata,
) -> OutcomeSet {
    let submission_id = Uuid::now_v7();
    let span = tracing::info_span!(
        "submission",
        %submission_id,
        ip = %meta.ip,
        user_agent = %meta.user_agent,
        referer = %meta.referer,
    );

    async {
        let (record, notification) = tokio::join!(
            state.records.create_record(input),
            state.notifications.notify(input),
        );

        let mut outcome = OutcomeSet::new();
        absorb(&mut outcome, Integration::Notion, record);
        absorb(&mut outcome, Integration::Slack, notification);

        if outcome.is_clean() {
            tracing::info!("Lead forwarded to all integrations");
        } else if !outcome.all_failed() {
            tracing::warn!("Lead partially forwarded, failed: {:?}", outcome.failed());
        }

        outcome
    }
    .instrument(span)
    .await
}

fn absorb(outcome: &mut OutcomeSet, integration: Integration, result: Result<(), SinkError>) {
    match result {
        Ok(()) => tracing::debug!("{integration} call succeeded"),
        Err(SinkError::Status { status, body }) => {
            tracing::error!("{integration} error: {status} {body}");
            outcome.record_failure(integration);
        }
        Err(err) => {
            tracing::error!("{integration} fetch error: {err}");
            outcome.record_failure(integration);
        }
    }
}
