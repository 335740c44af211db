use ccm_core::project::{discover_projects, Discovery, Project};
use ccm_core::{paths, CcmError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::{broadcast, RwLock};

use crate::error::AppError;

const WATCH_INTERVAL: Duration = Duration::from_millis(800);

/// What caused an `update` on the SSE feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// `POST /api/projects/scan` replaced the project index.
    Rescan,
    /// An agent file was created or rewritten.
    AgentSaved,
    /// `~/.claude.json` changed on disk.
    Registry,
}

impl Change {
    pub fn as_str(self) -> &'static str {
        match self {
            Change::Rescan => "rescan",
            Change::AgentSaved => "agent-saved",
            Change::Registry => "registry",
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Home directory holding `.claude.json` and `.claude/`.
    pub home: PathBuf,
    /// Project index, filled on first use and dropped on rescan or registry change.
    pub cache: Arc<RwLock<Option<Arc<Discovery>>>>,
    /// Bumped on every invalidation; a scan started under an older value is
    /// not cached.
    generation: Arc<AtomicU64>,
    pub event_tx: broadcast::Sender<Change>,
}

impl AppState {
    pub fn new(home: PathBuf) -> Self {
        let (tx, _) = broadcast::channel(64);
        let state = Self {
            home,
            cache: Arc::new(RwLock::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
            event_tx: tx,
        };

        // Poll the registry mtime so projects added by Claude Code itself
        // show up without a manual rescan.
        // Guard: only spawn if inside a Tokio runtime (skipped in sync unit tests).
        if tokio::runtime::Handle::try_current().is_ok() {
            let watcher = state.clone();
            tokio::spawn(async move { watcher.watch_registry().await });
        }

        state
    }

    async fn watch_registry(self) {
        let registry = paths::claude_json_path(&self.home);
        let mut last_mtime = registry_mtime(&registry).await;
        loop {
            tokio::time::sleep(WATCH_INTERVAL).await;
            let mtime = registry_mtime(&registry).await;
            if mtime != last_mtime {
                last_mtime = mtime;
                tracing::debug!(path = %registry.display(), "project registry changed");
                self.invalidate().await;
                self.notify(Change::Registry);
            }
        }
    }

    /// Tell SSE subscribers that something changed.
    pub fn notify(&self, change: Change) {
        let _ = self.event_tx.send(change);
    }

    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        self.generation.fetch_add(1, Ordering::SeqCst);
        *cache = None;
    }

    /// The cached project index, discovering it if needed.
    pub async fn discovery(&self) -> Result<Arc<Discovery>, AppError> {
        if let Some(d) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(d));
        }
        self.rescan().await
    }

    /// Rediscover projects and replace the cache wholesale.
    ///
    /// The result is always returned, but it is only cached when no
    /// invalidation happened while the scan ran.
    pub async fn rescan(&self) -> Result<Arc<Discovery>, AppError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let home = self.home.clone();
        let discovery = tokio::task::spawn_blocking(move || discover_projects(&home))
            .await
            .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;
        let discovery = Arc::new(discovery);
        self.store(generation, Arc::clone(&discovery)).await;
        Ok(discovery)
    }

    async fn store(&self, generation: u64, discovery: Arc<Discovery>) -> bool {
        let mut cache = self.cache.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("discarding project scan overtaken by an invalidation");
            return false;
        }
        *cache = Some(discovery);
        true
    }

    /// Resolve a project id to a project whose directory still exists.
    pub async fn project(&self, id: &str) -> Result<Project, AppError> {
        let discovery = self.discovery().await?;
        let project = discovery
            .get(id)
            .cloned()
            .ok_or_else(|| CcmError::ProjectNotFound(id.to_string()))?;
        if !project.path.is_dir() {
            return Err(CcmError::ProjectMissing(project.path.display().to_string()).into());
        }
        Ok(project)
    }
}

async fn registry_mtime(path: &std::path::Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}
