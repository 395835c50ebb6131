//! Scripted `RagBackend` for unit tests.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ragchat_types::chat::SessionId;
use ragchat_types::error::BackendError;
use ragchat_types::rag::{ChatRequest, ChatResponse, IngestResponse, IngestUrlRequest};
use tokio::sync::Semaphore;

use crate::backend::RagBackend;

/// Replies are popped in call order; an empty script yields a transport error.
#[derive(Default)]
pub struct MockBackend {
    ingest_replies: Mutex<VecDeque<Result<IngestResponse, BackendError>>>,
    chat_replies: Mutex<VecDeque<Result<ChatResponse, BackendError>>>,
    pub upload_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
    pub uploaded: Mutex<Vec<(String, usize)>>,
    pub url_requests: Mutex<Vec<IngestUrlRequest>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
    /// When set, every call waits for a permit before answering.
    gate: Option<Arc<Semaphore>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose calls block until `release` hands out permits.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (backend, gate)
    }

    pub fn push_ingest(self, reply: Result<IngestResponse, BackendError>) -> Self {
        self.ingest_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_session(self, id: &str, filename: &str) -> Self {
        self.push_ingest(Ok(IngestResponse {
            session_id: SessionId::from(id),
            filename: filename.to_string(),
        }))
    }

    pub fn push_chat(self, reply: Result<ChatResponse, BackendError>) -> Self {
        self.chat_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_answer(self, answer: &str) -> Self {
        self.push_chat(Ok(ChatResponse {
            answers: Some(vec![answer.to_string()]),
        }))
    }

    pub fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn chats(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    fn next_ingest(&self) -> Result<IngestResponse, BackendError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.ingest_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("no scripted reply".into())))
    }

    fn gated_reply<T: Send>(&self, reply: T) -> impl Future<Output = T> + Send + use<T> {
        let gate = self.gate.clone();
        async move {
            if let Some(gate) = gate {
                let permit = gate.acquire().await.unwrap();
                permit.forget();
            }
            reply
        }
    }
}

impl RagBackend for MockBackend {
    fn upload_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> impl Future<Output = Result<IngestResponse, BackendError>> + Send {
        self.uploaded
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.len()));
        let reply = self.next_ingest();
        self.gated_reply(reply)
    }

    fn upload_url(
        &self,
        request: &IngestUrlRequest,
    ) -> impl Future<Output = Result<IngestResponse, BackendError>> + Send {
        self.url_requests.lock().unwrap().push(request.clone());
        let reply = self.next_ingest();
        self.gated_reply(reply)
    }

    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, BackendError>> + Send {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        self.chat_requests.lock().unwrap().push(request.clone());
        let reply = self
            .chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Transport("no scripted reply".into())));
        self.gated_reply(reply)
    }
}
