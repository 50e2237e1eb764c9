//! In-memory transport for unit tests.

use crate::error::{Result, VaultError};
use crate::xcall::{Reply, Transport};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Records every URL and answers with queued replies in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: RefCell<VecDeque<Reply>>,
    urls: RefCell<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&self, stdout: &str) {
        self.replies.borrow_mut().push_back(Reply::success(stdout));
    }

    pub fn push_failure(&self, stderr: &str) {
        self.replies.borrow_mut().push_back(Reply::failure(stderr));
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.borrow().clone()
    }
}

impl Transport for MockTransport {
    fn send(&self, url: &str) -> Result<Reply> {
        self.urls.borrow_mut().push(url.to_string());
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| VaultError::Other(format!("no reply queued for {}", url)))
    }
}
