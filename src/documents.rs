//! Document outbox.
//!
//! Rental mutations are persisted first; the documents they produce
//! (agreement, invoice, payment receipt) are queued here as jobs and
//! rendered afterwards. A failed render leaves the job queued for the next
//! dispatch until it runs out of attempts. Rendering never touches the
//! rental record, so a failure can't roll back a persisted mutation.
//!
//! Jobs are idempotent on `(rental_id, kind, revision)`: enqueuing the same
//! triple twice returns the existing job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::PayableSummary;

/// The kind of document a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Rental agreement, produced when a rental is created.
    Agreement,
    /// Final invoice, produced when a rental is completed.
    Invoice,
    /// Receipt, produced when a payment is recorded.
    PaymentReceipt,
}

impl DocumentKind {
    /// Human-readable title of the document.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Agreement => "Rental Agreement",
            DocumentKind::Invoice => "Invoice",
            DocumentKind::PaymentReceipt => "Payment Receipt",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Delivery state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for a (re)try.
    Pending,
    /// Rendered successfully.
    Delivered,
    /// Gave up after the maximum number of attempts.
    Failed,
}

/// A queued document generation job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentJob {
    /// Unique identifier of the job.
    pub id: Uuid,
    /// The rental the document is for.
    pub rental_id: Uuid,
    /// What to render.
    pub kind: DocumentKind,
    /// Rental revision the payload was taken from.
    pub revision: u32,
    /// Snapshot of the data to render.
    pub payload: serde_json::Value,
    /// Render attempts so far.
    pub attempts: u32,
    /// Delivery state.
    pub status: JobStatus,
    /// Error from the most recent failed attempt.
    pub last_error: Option<String>,
    /// When the job was queued.
    pub enqueued_at: DateTime<Utc>,
    /// When the job was last attempted.
    pub attempted_at: Option<DateTime<Utc>>,
    /// When the job was delivered.
    pub delivered_at: Option<DateTime<Utc>>,
}

/// A rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// The job that produced the document.
    pub job_id: Uuid,
    /// The rental the document is for.
    pub rental_id: Uuid,
    /// What was rendered.
    pub kind: DocumentKind,
    /// Rental revision the document reflects.
    pub revision: u32,
    /// Document body.
    pub body: String,
    /// When the document was rendered.
    pub rendered_at: DateTime<Utc>,
}

/// Renders queued document jobs.
pub trait DocumentRenderer: Send + Sync {
    /// Renders one job.
    ///
    /// # Errors
    ///
    /// Returns `DocumentRender` if the job can't be rendered.
    fn render(&self, job: &DocumentJob) -> EngineResult<RenderedDocument>;
}

/// Renders a plain-text summary of the payable amounts in a job payload.
///
/// Expects the payload to carry a `summary` object in [`PayableSummary`]
/// form.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryRenderer;

impl DocumentRenderer for SummaryRenderer {
    fn render(&self, job: &DocumentJob) -> EngineResult<RenderedDocument> {
        let summary_value = job
            .payload
            .get("summary")
            .cloned()
            .ok_or_else(|| EngineError::DocumentRender {
                job_id: job.id,
                message: "payload has no summary".to_string(),
            })?;
        let summary: PayableSummary =
            serde_json::from_value(summary_value).map_err(|e| EngineError::DocumentRender {
                job_id: job.id,
                message: format!("invalid summary: {}", e),
            })?;

        let mut body = format!(
            "{}\nRental: {}\nRevision: {}\n\n",
            job.kind.title(),
            job.rental_id,
            job.revision
        );
        body.push_str(&format!("Subtotal:  {}\n", summary.subtotal));
        body.push_str(&format!("Discount:  {}\n", summary.discount_amount));
        body.push_str(&format!("Total:     {}\n", summary.final_amount));
        body.push_str(&format!("Paid:      {}\n", summary.total_paid));
        body.push_str(&format!("Remaining: {}\n", summary.remaining));

        if let Some(payment) = job.payload.get("payment") {
            let amount = payment.get("amount").and_then(|v| v.as_str()).unwrap_or("0");
            body.push_str(&format!("\nPayment received: {}\n", amount));
        }

        Ok(RenderedDocument {
            job_id: job.id,
            rental_id: job.rental_id,
            kind: job.kind,
            revision: job.revision,
            body,
            rendered_at: Utc::now(),
        })
    }
}

/// Counts from one dispatch pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Jobs attempted in this pass.
    pub attempted: usize,
    /// Jobs rendered in this pass.
    pub delivered: usize,
    /// Jobs that failed and will be retried.
    pub retrying: usize,
    /// Jobs that failed for the last time.
    pub failed: usize,
}

type JobKey = (Uuid, DocumentKind, u32);

/// Queue of document jobs and the documents rendered from them.
///
/// Rendered documents are kept per rental and read back through
/// [`DocumentOutbox::documents_for`].
#[derive(Debug, Clone)]
pub struct DocumentOutbox {
    max_attempts: u32,
    jobs: Vec<DocumentJob>,
    queued: HashMap<JobKey, Uuid>,
    documents: Vec<RenderedDocument>,
}

impl DocumentOutbox {
    /// Creates an empty outbox.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            jobs: Vec::new(),
            queued: HashMap::new(),
            documents: Vec::new(),
        }
    }

    /// Queues a job and returns its id.
    ///
    /// If a job for the same rental, kind and revision already exists its id
    /// is returned and nothing is queued.
    pub fn enqueue(
        &mut self,
        rental_id: Uuid,
        kind: DocumentKind,
        revision: u32,
        payload: serde_json::Value,
    ) -> Uuid {
        if let Some(&existing) = self.queued.get(&(rental_id, kind, revision)) {
            debug!(job_id = %existing, %rental_id, %kind, revision, "Document job already queued");
            return existing;
        }

        let job = DocumentJob {
            id: Uuid::new_v4(),
            rental_id,
            kind,
            revision,
            payload,
            attempts: 0,
            status: JobStatus::Pending,
            last_error: None,
            enqueued_at: Utc::now(),
            attempted_at: None,
            delivered_at: None,
        };
        let id = job.id;
        debug!(job_id = %id, %rental_id, %kind, revision, "Document job queued");
        self.queued.insert((rental_id, kind, revision), id);
        self.jobs.push(job);
        id
    }

    /// Attempts every pending job once.
    pub fn dispatch(&mut self, renderer: &dyn DocumentRenderer) -> DispatchReport {
        let mut report = DispatchReport::default();
        let max_attempts = self.max_attempts;

        for job in self
            .jobs
            .iter_mut()
            .filter(|job| job.status == JobStatus::Pending)
        {
            report.attempted += 1;
            job.attempts += 1;
            job.attempted_at = Some(Utc::now());

            match renderer.render(job) {
                Ok(document) => {
                    job.status = JobStatus::Delivered;
                    job.last_error = None;
                    job.delivered_at = Some(document.rendered_at);
                    self.documents.push(document);
                    report.delivered += 1;
                }
                Err(e) => {
                    job.last_error = Some(e.to_string());
                    if job.attempts >= max_attempts {
                        job.status = JobStatus::Failed;
                        report.failed += 1;
                        warn!(job_id = %job.id, attempts = job.attempts, error = %e, "Document job failed");
                    } else {
                        report.retrying += 1;
                        debug!(job_id = %job.id, attempts = job.attempts, error = %e, "Document job will be retried");
                    }
                }
            }
        }

        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            retrying = report.retrying,
            failed = report.failed,
            "Document outbox dispatched"
        );
        report
    }

    /// All jobs, oldest first.
    pub fn jobs(&self) -> &[DocumentJob] {
        &self.jobs
    }

    /// Jobs for one rental, oldest first.
    pub fn jobs_for(&self, rental_id: Uuid) -> Vec<&DocumentJob> {
        self.jobs
            .iter()
            .filter(|job| job.rental_id == rental_id)
            .collect()
    }

    /// Number of jobs waiting for a (re)try.
    pub fn pending_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|job| job.status == JobStatus::Pending)
            .count()
    }

    /// Documents rendered so far.
    pub fn documents(&self) -> &[RenderedDocument] {
        &self.documents
    }

    /// Documents rendered for one rental, oldest first.
    pub fn documents_for(&self, rental_id: Uuid) -> Vec<&RenderedDocument> {
        self.documents
            .iter()
            .filter(|document| document.rental_id == rental_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::dec;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyRenderer {
        failures_left: AtomicU32,
    }

    impl FlakyRenderer {
        fn failing(times: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(times),
            }
        }
    }

    impl DocumentRenderer for FlakyRenderer {
        fn render(&self, job: &DocumentJob) -> EngineResult<RenderedDocument> {
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(EngineError::DocumentRender {
                    job_id: job.id,
                    message: "upload timed out".to_string(),
                });
            }
            SummaryRenderer.render(job)
        }
    }

    fn payload() -> serde_json::Value {
        let summary = PayableSummary::derive(dec("600"), dec("60"), Decimal::ZERO, dec("0.001"));
        serde_json::json!({ "summary": summary })
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let mut outbox = DocumentOutbox::new(3);
        let rental_id = Uuid::new_v4();

        let first = outbox.enqueue(rental_id, DocumentKind::Agreement, 1, payload());
        let second = outbox.enqueue(rental_id, DocumentKind::Agreement, 1, payload());
        let receipt = outbox.enqueue(rental_id, DocumentKind::PaymentReceipt, 2, payload());

        assert_eq!(first, second);
        assert_ne!(first, receipt);
        assert_eq!(outbox.jobs().len(), 2);
        assert_eq!(outbox.pending_count(), 2);
    }

    #[test]
    fn test_dispatch_renders_summary() {
        let mut outbox = DocumentOutbox::new(3);
        let rental_id = Uuid::new_v4();
        outbox.enqueue(rental_id, DocumentKind::Agreement, 1, payload());

        let report = outbox.dispatch(&SummaryRenderer);
        assert_eq!(report.delivered, 1);
        assert_eq!(outbox.jobs()[0].status, JobStatus::Delivered);
        assert!(outbox.documents()[0].body.contains("Total:     540"));
        assert!(outbox.documents()[0].body.starts_with("Rental Agreement"));
    }

    #[test]
    fn test_documents_are_read_back_per_rental() {
        let mut outbox = DocumentOutbox::new(3);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        for revision in 1..=25 {
            outbox.enqueue(first, DocumentKind::PaymentReceipt, revision, payload());
            outbox.enqueue(second, DocumentKind::PaymentReceipt, revision, payload());
        }
        outbox.enqueue(first, DocumentKind::PaymentReceipt, 7, payload());

        outbox.dispatch(&SummaryRenderer);
        assert_eq!(outbox.jobs().len(), 50);
        assert_eq!(outbox.jobs_for(first).len(), 25);

        let documents = outbox.documents_for(first);
        assert_eq!(documents.len(), 25);
        assert!(documents.iter().all(|d| d.rental_id == first));
        assert_eq!(documents[6].revision, 7);
    }

    #[test]
    fn test_failed_render_is_retried() {
        let mut outbox = DocumentOutbox::new(3);
        outbox.enqueue(Uuid::new_v4(), DocumentKind::Invoice, 1, payload());
        let renderer = FlakyRenderer::failing(1);

        let first = outbox.dispatch(&renderer);
        assert_eq!(first.retrying, 1);
        assert_eq!(outbox.jobs()[0].status, JobStatus::Pending);
        assert!(outbox.jobs()[0].last_error.as_deref().unwrap().contains("upload timed out"));

        let second = outbox.dispatch(&renderer);
        assert_eq!(second.delivered, 1);
        assert_eq!(outbox.jobs()[0].attempts, 2);
        assert!(outbox.jobs()[0].last_error.is_none());
    }

    #[test]
    fn test_job_fails_after_max_attempts() {
        let mut outbox = DocumentOutbox::new(2);
        outbox.enqueue(Uuid::new_v4(), DocumentKind::Invoice, 1, payload());
        let renderer = FlakyRenderer::failing(10);

        outbox.dispatch(&renderer);
        let report = outbox.dispatch(&renderer);
        assert_eq!(report.failed, 1);
        assert_eq!(outbox.jobs()[0].status, JobStatus::Failed);

        let report = outbox.dispatch(&renderer);
        assert_eq!(report.attempted, 0);
    }

    #[test]
    fn test_summary_renderer_rejects_bad_payload() {
        let mut outbox = DocumentOutbox::new(1);
        outbox.enqueue(Uuid::new_v4(), DocumentKind::Agreement, 1, serde_json::json!({}));

        let report = outbox.dispatch(&SummaryRenderer);
        assert_eq!(report.failed, 1);
        assert!(outbox.jobs()[0].last_error.as_deref().unwrap().contains("no summary"));
    }
}
