use crate::domain::{BumpClass, ReleaseVersion};
use crate::error::{ReleaseError, Result};
use crate::version::VersionTool;
use std::cell::{Cell, RefCell};

/// Mock version tool with a scripted result for the next bump
pub struct MockVersionTool {
    available: bool,
    current: RefCell<String>,
    next: String,
    fail_bump: bool,
    bumps: RefCell<Vec<BumpClass>>,
    reads: Cell<usize>,
}

impl MockVersionTool {
    /// Tool reporting `current`, which becomes `next` after any bump
    pub fn new(current: impl Into<String>, next: impl Into<String>) -> Self {
        MockVersionTool {
            available: true,
            current: RefCell::new(current.into()),
            next: next.into(),
            fail_bump: false,
            bumps: RefCell::new(Vec::new()),
            reads: Cell::new(0),
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn with_failing_bump(mut self) -> Self {
        self.fail_bump = true;
        self
    }

    /// Bumps applied so far
    pub fn bumps(&self) -> Vec<BumpClass> {
        self.bumps.borrow().clone()
    }

    /// Number of version reads
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl VersionTool for MockVersionTool {
    fn program(&self) -> &str {
        "uv"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn current_version(&self) -> Result<ReleaseVersion> {
        self.reads.set(self.reads.get() + 1);
        ReleaseVersion::parse(&self.current.borrow())
    }

    fn bump(&self, class: BumpClass) -> Result<()> {
        self.bumps.borrow_mut().push(class);
        if self.fail_bump {
            return Err(ReleaseError::BumpFailed(format!(
                "`{}` failed with exit code 2",
                self.bump_command(class)
            )));
        }
        *self.current.borrow_mut() = self.next.clone();
        Ok(())
    }
}
