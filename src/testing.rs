//! In-memory doubles for the mail transport and a call-counting store wrapper.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use lettre::Message;
use lettre::message::Mailbox;
use resultmail_core::{ArtifactHandle, ArtifactStore, StorageError, StoreFuture};

use crate::utils::email::{MailError, MailFuture, Mailer};

fn test_sender() -> Mailbox {
    Mailbox::new(
        Some("Result Mailer".to_string()),
        "results@school.test".parse().expect("static address is valid"),
    )
}

/// A message as it would have gone over the wire.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub recipients: Vec<String>,
    pub raw: String,
}

/// Accepts every message and keeps it for inspection.
pub struct RecordingMailer {
    sender: Mailbox,
    sent: Mutex<Vec<SentMessage>>,
}

impl Default for RecordingMailer {
    fn default() -> Self {
        Self {
            sender: test_sender(),
            sent: Mutex::new(Vec::new()),
        }
    }
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Mailer for RecordingMailer {
    fn sender(&self) -> &Mailbox {
        &self.sender
    }

    fn send(&self, message: Message) -> MailFuture<'_> {
        let recipients = message
            .envelope()
            .to()
            .iter()
            .map(|address| address.to_string())
            .collect();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage { recipients, raw });
        }
        Box::pin(async { Ok(()) })
    }
}

/// Rejects every message with the error produced by `make_error`.
pub struct FailingMailer {
    sender: Mailbox,
    make_error: Box<dyn Fn() -> MailError + Send + Sync>,
    attempts: AtomicUsize,
}

impl FailingMailer {
    pub fn new(make_error: impl Fn() -> MailError + Send + Sync + 'static) -> Self {
        Self {
            sender: test_sender(),
            make_error: Box::new(make_error),
            attempts: AtomicUsize::new(0),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Mailer for FailingMailer {
    fn sender(&self) -> &Mailbox {
        &self.sender
    }

    fn send(&self, _message: Message) -> MailFuture<'_> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let err = (self.make_error)();
        Box::pin(async move { Err(err) })
    }
}

/// Wraps a store and counts allocations and deletions.
pub struct CountingStore<S> {
    inner: S,
    allocations: AtomicUsize,
    deletes: AtomicUsize,
}

impl<S: ArtifactStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            allocations: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }
}

impl<S: ArtifactStore> ArtifactStore for CountingStore<S> {
    fn allocate(&self, enrollment_no: &str) -> Result<ArtifactHandle, StorageError> {
        self.allocations.fetch_add(1, Ordering::SeqCst);
        self.inner.allocate(enrollment_no)
    }

    fn write<'a>(&'a self, handle: &'a ArtifactHandle, content: &'a [u8]) -> StoreFuture<'a, u64> {
        self.inner.write(handle, content)
    }

    fn read<'a>(&'a self, handle: &'a ArtifactHandle) -> StoreFuture<'a, Vec<u8>> {
        self.inner.read(handle)
    }

    fn delete<'a>(&'a self, handle: &'a ArtifactHandle) -> StoreFuture<'a, ()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(handle)
    }

    fn exists(&self, handle: &ArtifactHandle) -> bool {
        self.inner.exists(handle)
    }
}
