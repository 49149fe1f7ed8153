//! Shared fakes for coordinator and policy tests: a recording document host,
//! a scripted prompt, and a progress sink that tracks live surfaces.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use kumo_types::SaveMode;

use crate::ports::{
    Choice, Decision, DecisionPrompt, DocumentHost, ErrorNotice, ProgressRequest, ProgressSignal,
    ProgressSink, ProgressSurface, PromptRequest,
};

// ============================================================================
// Recording host
// ============================================================================

/// Ordered log entry of a host call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HostCall {
    RevokeCredentials,
    TriggerSave(SaveMode),
    ReloadFromRemote,
    SaveLocally,
}

/// Records every call in order; `save_locally_only` can be made to fail.
#[derive(Default)]
pub(crate) struct RecordingHost {
    pub saves_count: AtomicU64,
    pub fail_local_save: AtomicBool,
    pub calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn with_saves_count(count: u64) -> Arc<Self> {
        let host = Self::default();
        host.saves_count.store(count, Ordering::Relaxed);
        Arc::new(host)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn count_of(&self, call: HostCall) -> usize {
        self.calls.lock().iter().filter(|c| **c == call).count()
    }
}

#[async_trait]
impl DocumentHost for RecordingHost {
    async fn saves_count(&self) -> u64 {
        self.saves_count.load(Ordering::Relaxed)
    }

    async fn trigger_save(&self, mode: SaveMode) -> anyhow::Result<()> {
        self.calls.lock().push(HostCall::TriggerSave(mode));
        Ok(())
    }

    async fn reload_from_remote(&self) -> anyhow::Result<()> {
        self.calls.lock().push(HostCall::ReloadFromRemote);
        Ok(())
    }

    async fn save_locally_only(&self) -> anyhow::Result<()> {
        self.calls.lock().push(HostCall::SaveLocally);
        if self.fail_local_save.load(Ordering::Relaxed) {
            anyhow::bail!("disk full");
        }
        Ok(())
    }

    async fn revoke_credentials(&self) {
        self.calls.lock().push(HostCall::RevokeCredentials);
    }
}

// ============================================================================
// Scripted prompt
// ============================================================================

/// Answers `choose` from a queue of scripted decisions (default: dismissed)
/// and records every request and notice.
#[derive(Default)]
pub(crate) struct ScriptedPrompt {
    replies: Mutex<VecDeque<Decision>>,
    pub requests: Mutex<Vec<PromptRequest>>,
    pub notices: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedPrompt {
    pub fn answering(replies: impl IntoIterator<Item = Decision>) -> Arc<Self> {
        let prompt = Self::default();
        prompt.replies.lock().extend(replies);
        Arc::new(prompt)
    }

    pub fn selecting(choice: Choice) -> Arc<Self> {
        Self::answering([Decision::Selected(choice)])
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DecisionPrompt for ScriptedPrompt {
    async fn choose(&self, request: PromptRequest) -> Decision {
        self.requests.lock().push(request);
        self.replies.lock().pop_front().unwrap_or(Decision::Dismissed)
    }

    async fn show_error_notice(&self, notice: ErrorNotice<'_>) {
        self.notices
            .lock()
            .push((notice.title.to_string(), notice.diagnostic.map(String::from)));
    }
}

// ============================================================================
// Counting progress sink
// ============================================================================

/// Hands out surfaces whose polls answer from a shared script (default:
/// Continue), while tracking how many surfaces are live and the high-water
/// mark — the "at most one surface per document" property checks that mark.
#[derive(Default)]
pub(crate) struct CountingProgressSink {
    pub begins: AtomicUsize,
    pub live: Arc<AtomicUsize>,
    pub max_live: Arc<AtomicUsize>,
    pub polls: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<ProgressSignal>>>,
}

impl CountingProgressSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_signals(signals: impl IntoIterator<Item = ProgressSignal>) -> Arc<Self> {
        let sink = Self::default();
        sink.script.lock().extend(signals);
        Arc::new(sink)
    }

    pub fn push_signal(&self, signal: ProgressSignal) {
        self.script.lock().push_back(signal);
    }

    pub fn live_surfaces(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live_surfaces(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn begin_count(&self) -> usize {
        self.begins.load(Ordering::SeqCst)
    }
}

impl ProgressSink for CountingProgressSink {
    fn begin(&self, _request: ProgressRequest) -> Box<dyn ProgressSurface> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
        Box::new(CountingSurface {
            live: self.live.clone(),
            polls: self.polls.clone(),
            script: self.script.clone(),
        })
    }
}

struct CountingSurface {
    live: Arc<AtomicUsize>,
    polls: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<ProgressSignal>>>,
}

impl ProgressSurface for CountingSurface {
    fn poll(&mut self, _value: u64, _max: u64) -> ProgressSignal {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .pop_front()
            .unwrap_or(ProgressSignal::Continue)
    }
}

impl Drop for CountingSurface {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
