#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::api::{ApiClient, BatchSendRequest};
use crate::errors::ApiError;
use crate::models::application::Recipient;
use crate::notify::Notifications;

pub const NO_VALID_RECIPIENTS: &str = "Please add at least one valid recipient.";
pub const SUBMISSION_IN_FLIGHT: &str = "A submission is already in progress.";

/// Editable, ordered list of batch recipients.
///
/// Always holds at least one row so there is something to type into; blank
/// rows are allowed while editing and only filtered out at submission time.
#[derive(Debug, Clone)]
pub struct RecipientList {
    rows: Vec<Recipient>,
}

impl RecipientList {
    pub fn new() -> Self {
        Self {
            rows: vec![Recipient::default()],
        }
    }

    /// Builds a list from pre-filled rows; an empty input falls back to the
    /// single-blank-row default.
    pub fn from_rows(rows: Vec<Recipient>) -> Self {
        if rows.is_empty() {
            Self::new()
        } else {
            Self { rows }
        }
    }

    pub fn rows(&self) -> &[Recipient] {
        &self.rows
    }

    pub fn add_row(&mut self) {
        self.rows.push(Recipient::default());
    }

    /// Removes a row. Removing the last one resets to a single blank row so
    /// the at-least-one-row invariant holds.
    pub fn remove_row(&mut self, index: usize) {
        if index < self.rows.len() {
            self.rows.remove(index);
        }
        if self.rows.is_empty() {
            self.rows.push(Recipient::default());
        }
    }

    pub fn set_row(&mut self, index: usize, recipient: Recipient) {
        if let Some(row) = self.rows.get_mut(index) {
            *row = recipient;
        }
    }

    /// The rows worth sending. Validity is checked lazily here, not on edit.
    pub fn valid_recipients(&self) -> Vec<Recipient> {
        self.rows.iter().filter(|r| r.is_valid()).cloned().collect()
    }

    /// Back to the single-blank-row default after a successful send.
    pub fn reset(&mut self) {
        self.rows = vec![Recipient::default()];
    }
}

impl Default for RecipientList {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SubmitOutcome {
    pub sent_count: u64,
}

/// Batch submission flow: validate locally, send through the gateway, report
/// through the notification queue.
pub struct SubmissionWorkflow {
    api: ApiClient,
    notifications: Notifications,
    in_flight: AtomicBool,
}

impl SubmissionWorkflow {
    pub fn new(api: ApiClient, notifications: Notifications) -> Self {
        Self {
            api,
            notifications,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Sends the valid subset of `list` as one batch.
    ///
    /// On success the list resets to its single-blank-row default; on
    /// failure it is left untouched so the user can retry without
    /// re-entering anything. The batch is all-or-nothing from the client's
    /// point of view — the backend's single response decides.
    pub async fn submit(
        &self,
        list: &mut RecipientList,
        subject: &str,
    ) -> Result<SubmitOutcome, ApiError> {
        let valid = list.valid_recipients();
        if valid.is_empty() {
            self.notifications.error(NO_VALID_RECIPIENTS);
            return Err(ApiError::Validation(NO_VALID_RECIPIENTS.to_string()));
        }

        // One submission at a time. The UI disables its trigger while a send
        // is in flight; this guard enforces the same rule in the runtime.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            self.notifications.error(SUBMISSION_IN_FLIGHT);
            return Err(ApiError::Validation(SUBMISSION_IN_FLIGHT.to_string()));
        }
        let _guard = InFlightGuard(&self.in_flight);

        let submitted = valid.len() as u64;
        let batch = BatchSendRequest {
            recipients: valid,
            subject: subject.to_string(),
        };

        match self.api.send_batch_applications(&batch).await {
            Ok(receipt) => {
                let sent_count = receipt.sent_count.unwrap_or(submitted);
                info!(sent_count, "batch send succeeded");
                self.notifications
                    .success(format!("Successfully sent {sent_count} applications!"));
                list.reset();
                Ok(SubmitOutcome { sent_count })
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(err)
            }
        }
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
