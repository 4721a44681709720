use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::auth::SessionStore;
use crate::config::Config;
use crate::extraction::DocumentExtractor;
use crate::interview::InterviewRegistry;
use crate::links::LinkIssuer;
use crate::store::RecruitmentStore;
use crate::wizard::WizardRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecruitmentStore>,
    pub sessions: SessionStore,
    pub s3: S3Client,
    pub config: Config,
    /// Default: MockCvExtractor. Swap via CV_EXTRACTOR env.
    pub extractor: Arc<dyn DocumentExtractor>,
    pub links: Arc<dyn LinkIssuer>,
    pub wizards: Arc<WizardRegistry>,
    pub interviews: Arc<InterviewRegistry>,
}

/// State for handler tests: in-memory store and sessions, mock extraction,
/// and an S3 client that is never contacted.
#[cfg(test)]
pub fn test_state(store: Arc<crate::store::fake::RecordingStore>) -> AppState {
    use crate::auth::sessions::MemorySessions;
    use crate::config::ExtractorBackend;
    use crate::extraction::MockCvExtractor;
    use crate::links::BaseUrlLinkIssuer;

    let config = Config {
        database_url: "postgres://localhost/selectra_test".to_string(),
        redis_url: "redis://127.0.0.1:1/".to_string(),
        s3_bucket: "selectra-test".to_string(),
        s3_endpoint: "http://127.0.0.1:1".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        app_base_url: "https://selectra.app".to_string(),
        session_ttl_secs: 60,
        cv_extractor: ExtractorBackend::Mock,
        mock_extraction_delay_ms: 0,
        interview_budget_secs: 2400,
        port: 0,
        rust_log: "debug".to_string(),
    };
    let s3_config = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .build();

    AppState {
        store: store.clone(),
        sessions: SessionStore::with_backend(Arc::new(MemorySessions::default()), 60),
        s3: S3Client::from_conf(s3_config),
        extractor: Arc::new(MockCvExtractor::new(std::time::Duration::ZERO)),
        links: Arc::new(BaseUrlLinkIssuer::new(&config.app_base_url)),
        wizards: Arc::new(WizardRegistry::new()),
        interviews: Arc::new(InterviewRegistry::new(store, config.interview_budget_secs)),
        config,
    }
}
