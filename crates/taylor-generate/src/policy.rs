use std::sync::atomic::{AtomicBool, Ordering};

use crate::options::AssignmentMode;

/// Shared bulk/sequential toggle, readable and writable at any time.
#[derive(Debug, Default)]
pub struct AssignmentPolicy {
    sequential: AtomicBool,
}

impl AssignmentPolicy {
    pub fn new(mode: AssignmentMode) -> Self {
        Self {
            sequential: AtomicBool::new(mode == AssignmentMode::Sequential),
        }
    }

    pub fn mode(&self) -> AssignmentMode {
        if self.sequential.load(Ordering::Acquire) {
            AssignmentMode::Sequential
        } else {
            AssignmentMode::Bulk
        }
    }

    pub fn set_mode(&self, mode: AssignmentMode) {
        self.sequential
            .store(mode == AssignmentMode::Sequential, Ordering::Release);
    }
}
