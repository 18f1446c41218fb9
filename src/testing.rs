//! In-memory doubles for the service traits, shared by workflow tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::context::AppContext;
use crate::domain::change::ChangeEntry;
use crate::domain::credential::ApiCredential;
use crate::error::{AppError, AppResult};
use crate::services::settings::API_KEY_SETTING;
use crate::services::{
    DiffTarget, Interaction, LanguageModelService, NoticeLevel, SettingsStore,
    VersionControlService,
};

/// Records every call as a short string such as `"stage a.txt"`.
#[derive(Default)]
pub struct MockGit {
    pub changes: Vec<ChangeEntry>,
    pub staged: Vec<ChangeEntry>,
    pub diffs: HashMap<String, String>,
    pub fail_stage: HashSet<String>,
    pub fail_list: bool,
    /// Commits touching any of these paths fail.
    pub fail_commit: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
    pub committed_paths: Mutex<Vec<Vec<String>>>,
}

impl MockGit {
    pub fn with_changes(changes: Vec<ChangeEntry>) -> Self {
        Self {
            changes,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with("stage ") || call.starts_with("commit "))
            .collect()
    }

    pub fn committed_paths(&self) -> Vec<Vec<String>> {
        self.committed_paths.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VersionControlService for MockGit {
    async fn list_changes(&self) -> AppResult<Vec<ChangeEntry>> {
        self.record("list_changes".to_string());
        if self.fail_list {
            return Err(AppError::Environment("not a git repository".to_string()));
        }
        Ok(self.changes.clone())
    }

    async fn list_staged(&self) -> AppResult<Vec<ChangeEntry>> {
        self.record("list_staged".to_string());
        Ok(self.staged.clone())
    }

    async fn diff(&self, path: &str, target: DiffTarget) -> AppResult<String> {
        let label = match target {
            DiffTarget::WorkingTree => "diff",
            DiffTarget::Staged => "diff --cached",
        };
        self.record(format!("{label} {path}"));
        Ok(match target {
            DiffTarget::WorkingTree => self.diffs.get(path).cloned().unwrap_or_default(),
            DiffTarget::Staged => String::new(),
        })
    }

    async fn stage(&self, entry: &ChangeEntry) -> AppResult<()> {
        let path = &entry.path;
        self.record(format!("stage {path}"));
        if self.fail_stage.contains(path) {
            return Err(AppError::VersionControl(format!(
                "git add exited with exit status: 128: cannot stage {path}"
            )));
        }
        Ok(())
    }

    async fn commit(&self, message: &str) -> AppResult<()> {
        self.record(format!("commit {message}"));
        if self.staged.iter().any(|entry| self.fail_commit.contains(&entry.path)) {
            return Err(commit_rejected());
        }
        Ok(())
    }

    async fn commit_paths(&self, message: &str, paths: &[String]) -> AppResult<()> {
        self.record(format!("commit {message}"));
        self.committed_paths.lock().unwrap().push(paths.to_vec());
        if paths.iter().any(|path| self.fail_commit.contains(path)) {
            return Err(commit_rejected());
        }
        Ok(())
    }
}

fn commit_rejected() -> AppError {
    AppError::VersionControl("git commit exited with exit status: 1: hook rejected".to_string())
}

/// Replies with queued texts (the last one repeats) or a failure.
pub struct MockModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockModel {
    pub fn replying(texts: &[&str]) -> Self {
        Self {
            replies: Mutex::new(texts.iter().map(|t| Ok(t.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(
                "Gemini returned no candidate text".to_string(),
            )])),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModelService for MockModel {
    async fn generate(&self, _credential: &ApiCredential, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply
            .unwrap_or_else(|| Err("no reply queued".to_string()))
            .map_err(AppError::Generation)
    }
}

/// Answers prompts from a script and collects notifications.
#[derive(Default)]
pub struct ScriptedInteraction {
    pub selection: Mutex<Option<Vec<usize>>>,
    pub text_replies: Mutex<VecDeque<Option<String>>>,
    pub notices: Mutex<Vec<(NoticeLevel, String)>>,
    pub prompts_seen: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedInteraction {
    pub fn selecting(indices: Option<Vec<usize>>) -> Self {
        Self {
            selection: Mutex::new(indices),
            ..Self::default()
        }
    }

    pub fn answering(replies: Vec<Option<&str>>) -> Self {
        Self {
            text_replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|reply| reply.map(str::to_string))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn prompts_seen(&self) -> Vec<(String, Option<String>)> {
        self.prompts_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Interaction for ScriptedInteraction {
    async fn select_many(&self, _title: &str, _items: &[String]) -> AppResult<Option<Vec<usize>>> {
        Ok(self.selection.lock().unwrap().clone())
    }

    async fn prompt_text(
        &self,
        prompt: &str,
        initial: Option<&str>,
        _secret: bool,
    ) -> AppResult<Option<String>> {
        self.prompts_seen
            .lock()
            .unwrap()
            .push((prompt.to_string(), initial.map(str::to_string)));
        Ok(self.text_replies.lock().unwrap().pop_front().flatten())
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        self.notices.lock().unwrap().push((level, message.to_string()));
    }
}

#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn with_api_key(key: &str) -> Self {
        let settings = Self::default();
        settings
            .values
            .lock()
            .unwrap()
            .insert(API_KEY_SETTING.to_string(), key.to_string());
        settings
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn test_context(
    git: Arc<dyn VersionControlService>,
    model: Arc<MockModel>,
    interaction: Arc<ScriptedInteraction>,
    settings: Arc<MemorySettings>,
) -> AppContext {
    AppContext::new(git, model, interaction, settings)
}

/// Runs `git` synchronously in `dir`, panicking on failure.
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A fresh repository with `a.txt` and `b.txt` committed.
pub fn init_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    run_git(dir.path(), &["init", "--quiet"]);
    run_git(dir.path(), &["config", "user.name", "Test User"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);
    run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
    fs::write(dir.path().join("a.txt"), "one\n").unwrap();
    fs::write(dir.path().join("b.txt"), "two\n").unwrap();
    run_git(dir.path(), &["add", "."]);
    run_git(dir.path(), &["commit", "--quiet", "-m", "init"]);
    dir
}
