use metrics_exporter_prometheus::PrometheusHandle;
use srecno_quiz::quiz::{
    AnalyticsError, AnalyticsEvent, AnalyticsSink, QuizResultId, QuizResultRecord,
    QuizResultRepository, ReportDocument, ReportError, ReportGenerator, ReportRequest,
    RepositoryError,
};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryQuizResultRepository {
    records: Arc<Mutex<HashMap<QuizResultId, QuizResultRecord>>>,
}

impl InMemoryQuizResultRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<QuizResultId, QuizResultRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("result store lock poisoned".to_string()))
    }
}

impl QuizResultRepository for InMemoryQuizResultRepository {
    fn save(&self, record: QuizResultRecord) -> Result<QuizResultRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.record_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.record_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &QuizResultId) -> Result<Option<QuizResultRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }
}

/// Analytics sink that writes events to the log stream.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingAnalyticsSink;

impl AnalyticsSink for TracingAnalyticsSink {
    fn track(&self, event: AnalyticsEvent) -> Result<(), AnalyticsError> {
        let payload =
            serde_json::to_string(&event).map_err(|err| AnalyticsError::Transport(err.to_string()))?;
        info!(event = event.name(), %payload, "analytics event");
        Ok(())
    }
}

/// Renders the detailed result as a UTF-8 text attachment.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PlainTextReportGenerator;

impl ReportGenerator for PlainTextReportGenerator {
    fn generate(&self, request: ReportRequest) -> Result<ReportDocument, ReportError> {
        let text = render_report(&request).map_err(|err| ReportError::Rendering(err.to_string()))?;
        Ok(ReportDocument {
            file_name: format!(
                "srecno-{}-{}.txt",
                request.outcome.quiz_type,
                request.generated_at.format("%Y%m%d")
            ),
            content_type: mime::TEXT_PLAIN_UTF_8,
            bytes: text.into_bytes(),
        })
    }
}

fn render_report(request: &ReportRequest) -> Result<String, std::fmt::Error> {
    let outcome = &request.outcome;
    let mut out = String::new();

    writeln!(out, "{}", request.quiz_title)?;
    writeln!(out, "Datum: {}", request.generated_at.format("%d.%m.%Y."))?;
    if let Some(lead) = &request.lead {
        writeln!(out, "Pripremljeno za: {}", lead.name)?;
    }
    writeln!(out)?;
    writeln!(out, "Rezultat: {:.0} / {:.0}", outcome.score, outcome.max_score)?;
    writeln!(out, "{}", outcome.result.title)?;
    writeln!(out, "{}", outcome.result.description)?;
    writeln!(out)?;

    writeln!(out, "Preporuke:")?;
    for recommendation in &outcome.result.recommendations {
        writeln!(out, "  - {recommendation}")?;
    }
    writeln!(out)?;

    writeln!(out, "Doprinos po pitanju:")?;
    for component in &outcome.components {
        writeln!(out, "  - {}: {:.1}", component.question, component.contribution)?;
    }
    writeln!(out)?;
    writeln!(out, "{}: {}", outcome.result.cta_text, outcome.result.cta_link)?;

    Ok(out)
}
