use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use rand::Rng;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::session::{
    CompletionReason, InterviewPhase, InterviewSession, InterviewSnapshot, StartOutcome,
};
use crate::models::interview::{INTERVIEW_COMPLETED, INTERVIEW_IN_PROGRESS};
use crate::store::RecruitmentStore;

const TICK: Duration = Duration::from_secs(1);
const SPEAKING_MS: std::ops::Range<u64> = 3_000..5_000;
/// How long a completed session's final snapshot stays in memory.
const FINISHED_RETENTION: Duration = Duration::from_secs(10 * 60);

struct LiveInterview {
    session: InterviewSession,
    ticker: Option<JoinHandle<()>>,
}

impl LiveInterview {
    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for LiveInterview {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

type SharedInterview = Arc<Mutex<LiveInterview>>;

struct Sessions {
    live: RwLock<HashMap<Uuid, SharedInterview>>,
    finished: RwLock<HashMap<Uuid, InterviewSnapshot>>,
    store: Arc<dyn RecruitmentStore>,
}

impl Sessions {
    /// Records the completion and retires the live entry, keeping its final
    /// snapshot for `FINISHED_RETENTION`.
    async fn conclude(
        self: &Arc<Self>,
        application_id: Uuid,
        snapshot: InterviewSnapshot,
        reason: CompletionReason,
    ) {
        info!("Interview for application {application_id} completed ({reason:?})");
        mark_interview(self.store.as_ref(), application_id, INTERVIEW_COMPLETED).await;

        // finished first: a concurrent start always finds one of the two entries
        self.finished.write().await.insert(application_id, snapshot);
        self.live.write().await.remove(&application_id);

        let sessions = Arc::downgrade(self);
        tokio::spawn(async move {
            tokio::time::sleep(FINISHED_RETENTION).await;
            if let Some(sessions) = sessions.upgrade() {
                sessions.finished.write().await.remove(&application_id);
            }
        });
    }
}

enum Lookup {
    Live(SharedInterview),
    Concluded(InterviewSnapshot),
    Unknown,
}

/// Live interview sessions keyed by application id.
///
/// Each started session owns a tokio ticker that counts the budget down
/// once per second. Tasks only hold weak references, so removing a session
/// from the map ends its timers. A completed interview never runs again:
/// its final snapshot is retained for a while, and after that the stored
/// interview row answers.
pub struct InterviewRegistry {
    sessions: Arc<Sessions>,
    budget_secs: u32,
}

impl InterviewRegistry {
    pub fn new(store: Arc<dyn RecruitmentStore>, budget_secs: u32) -> Self {
        Self {
            sessions: Arc::new(Sessions {
                live: RwLock::new(HashMap::new()),
                finished: RwLock::new(HashMap::new()),
                store,
            }),
            budget_secs,
        }
    }

    async fn get(&self, application_id: Uuid) -> Option<SharedInterview> {
        self.sessions.live.read().await.get(&application_id).cloned()
    }

    async fn get_or_create(&self, application_id: Uuid) -> SharedInterview {
        self.sessions
            .live
            .write()
            .await
            .entry(application_id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(LiveInterview {
                    session: InterviewSession::new(application_id, self.budget_secs),
                    ticker: None,
                }))
            })
            .clone()
    }

    async fn concluded(&self, application_id: Uuid) -> Result<Option<InterviewSnapshot>, AppError> {
        if let Some(snapshot) = self.sessions.finished.read().await.get(&application_id) {
            return Ok(Some(snapshot.clone()));
        }

        let stored = self.sessions.store.get_interview(application_id).await?;
        Ok(stored
            .filter(|row| row.status == INTERVIEW_COMPLETED)
            .map(|_| InterviewSession::closed(application_id).snapshot()))
    }

    async fn lookup(&self, application_id: Uuid) -> Result<Lookup, AppError> {
        if let Some(live) = self.get(application_id).await {
            return Ok(Lookup::Live(live));
        }
        Ok(match self.concluded(application_id).await? {
            Some(snapshot) => Lookup::Concluded(snapshot),
            None => Lookup::Unknown,
        })
    }

    /// Current state; an application with no interview activity reports a
    /// fresh, unstarted session.
    pub async fn snapshot(&self, application_id: Uuid) -> Result<InterviewSnapshot, AppError> {
        Ok(match self.lookup(application_id).await? {
            Lookup::Live(shared) => {
                let guard = shared.lock().await;
                guard.session.snapshot()
            }
            Lookup::Concluded(snapshot) => snapshot,
            Lookup::Unknown => InterviewSession::new(application_id, self.budget_secs).snapshot(),
        })
    }

    pub async fn start(&self, application_id: Uuid) -> Result<InterviewSnapshot, AppError> {
        let shared = self.get_or_create(application_id).await;
        let mut live = shared.lock().await;

        if live.session.phase() == InterviewPhase::NotStarted {
            if let Some(done) = self.concluded(application_id).await? {
                let mut map = self.sessions.live.write().await;
                if map
                    .get(&application_id)
                    .is_some_and(|current| Arc::ptr_eq(current, &shared))
                {
                    map.remove(&application_id);
                }
                return Ok(done);
            }
        }

        match live.session.start() {
            StartOutcome::Unchanged => {}
            StartOutcome::Running => {
                info!("Interview for application {application_id} started");
                self.mark(application_id, INTERVIEW_IN_PROGRESS).await;
                live.ticker = Some(spawn_ticker(
                    Arc::downgrade(&shared),
                    Arc::downgrade(&self.sessions),
                    application_id,
                ));
                schedule_speaking_reset(&shared, live.session.speaking_generation());
            }
            StartOutcome::Completed(reason) => self.finish(&mut live, application_id, reason).await,
        }
        Ok(live.session.snapshot())
    }

    pub async fn next_question(&self, application_id: Uuid) -> Result<InterviewSnapshot, AppError> {
        let shared = match self.lookup(application_id).await? {
            Lookup::Live(shared) => shared,
            Lookup::Concluded(snapshot) => return Ok(snapshot),
            Lookup::Unknown => return Err(not_started()),
        };
        let mut live = shared.lock().await;

        match live.session.next_question()? {
            Some(reason) => self.finish(&mut live, application_id, reason).await,
            None => schedule_speaking_reset(&shared, live.session.speaking_generation()),
        }
        Ok(live.session.snapshot())
    }

    pub async fn end(&self, application_id: Uuid) -> Result<InterviewSnapshot, AppError> {
        let shared = match self.lookup(application_id).await? {
            Lookup::Live(shared) => shared,
            Lookup::Concluded(snapshot) => return Ok(snapshot),
            Lookup::Unknown => return Err(not_started()),
        };
        let mut live = shared.lock().await;

        if let Some(reason) = live.session.end()? {
            self.finish(&mut live, application_id, reason).await;
        }
        Ok(live.session.snapshot())
    }

    /// Drops the live session, cancelling its timers, and any retained final
    /// snapshot. The stored interview row is untouched.
    pub async fn remove(&self, application_id: Uuid) -> bool {
        let live = self.sessions.live.write().await.remove(&application_id).is_some();
        let finished = self
            .sessions
            .finished
            .write()
            .await
            .remove(&application_id)
            .is_some();
        live || finished
    }

    async fn finish(&self, live: &mut LiveInterview, application_id: Uuid, reason: CompletionReason) {
        live.stop_ticker();
        self.sessions
            .conclude(application_id, live.session.snapshot(), reason)
            .await;
    }

    async fn mark(&self, application_id: Uuid, status: &str) {
        mark_interview(self.sessions.store.as_ref(), application_id, status).await;
    }
}

fn not_started() -> AppError {
    AppError::Validation("The interview has not started".to_string())
}

/// Best effort: the live session is authoritative for the candidate.
async fn mark_interview(store: &dyn RecruitmentStore, application_id: Uuid, status: &str) {
    if let Err(e) = store.set_interview_status(application_id, status).await {
        warn!("Could not mark interview for application {application_id} as {status}: {e}");
    }
}

fn spawn_ticker(
    live: Weak<Mutex<LiveInterview>>,
    sessions: Weak<Sessions>,
    application_id: Uuid,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + TICK, TICK);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        loop {
            interval.tick().await;
            let Some(shared) = live.upgrade() else {
                return;
            };
            let mut guard = shared.lock().await;
            if guard.session.phase() != InterviewPhase::InProgress {
                guard.ticker = None;
                return;
            }
            if let Some(reason) = guard.session.tick() {
                // the ticker exits on its own; no abort needed
                guard.ticker = None;
                if let Some(sessions) = sessions.upgrade() {
                    sessions
                        .conclude(application_id, guard.session.snapshot(), reason)
                        .await;
                }
                return;
            }
        }
    })
}

fn schedule_speaking_reset(live: &SharedInterview, generation: u64) {
    let delay = Duration::from_millis(rand::thread_rng().gen_range(SPEAKING_MS));
    let live = Arc::downgrade(live);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if let Some(live) = live.upgrade() {
            live.lock().await.session.stop_speaking(generation);
        }
    });
}
