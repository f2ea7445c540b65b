//! Position tracking inside the nested list structure of a report.
//!
//! A report body is an unordered list whose items hold a name (inside an
//! anchor) followed by nested lists:
//!
//! ```text
//! Job
//!     Job Details
//!         TradeGroup
//!     Component [CnC]
//!         Provisioning
//!     Component [Grid]
//!         Task1, Task2, ...
//!     Component [RWS]
//! ```
//!
//! Reaching a name we care about makes it the *pending* child of the current
//! section; the anchor's end tag *settles* it, pushing a [`Frame`]. A frame
//! counts the list items open inside it, starting at one for the item that
//! encloses the section's own name. When closing an item brings the count to
//! zero, that enclosing item is gone: the frame is popped and the parent,
//! which had counted the very same item, is decremented as well.

use std::fmt;

use tracing::debug;

use super::error::ReportError;

/// The sections of a report the extractor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Root,
    Body,
    Job,
    JobDetails,
    TradeGroup,
    Cnc,
    Provisioning,
    Grid,
    Rws,
}

impl Section {
    /// The section a section is nested in. `Root` has none.
    pub fn parent(self) -> Option<Section> {
        match self {
            Section::Root => None,
            Section::Body => Some(Section::Root),
            Section::Job => Some(Section::Body),
            Section::JobDetails | Section::Cnc | Section::Grid | Section::Rws => {
                Some(Section::Job)
            }
            Section::TradeGroup => Some(Section::JobDetails),
            Section::Provisioning => Some(Section::Cnc),
        }
    }

    /// Path segment name.
    pub fn name(self) -> &'static str {
        match self {
            Section::Root => "root",
            Section::Body => "body",
            Section::Job => "job",
            Section::JobDetails => "jobdetails",
            Section::TradeGroup => "tradegroup",
            Section::Cnc => "cnc",
            Section::Provisioning => "provisioning",
            Section::Grid => "grid",
            Section::Rws => "rws",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An entered section and the number of list items open inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub section: Section,
    pub items: u32,
}

/// Stack based tracker of the current section.
#[derive(Debug, Clone)]
pub struct PathTracker {
    frames: Vec<Frame>,
    pending: Option<Section>,
}

impl Default for PathTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTracker {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame {
                section: Section::Root,
                items: 1,
            }],
            pending: None,
        }
    }

    /// Return to the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The innermost settled section.
    pub fn current(&self) -> Section {
        self.top().section
    }

    /// The named child waiting for its anchor to close, if any.
    pub fn pending(&self) -> Option<Section> {
        self.pending
    }

    /// Whether no child is pending.
    pub fn is_settled(&self) -> bool {
        self.pending.is_none()
    }

    /// Number of open items in the current section.
    pub fn items(&self) -> u32 {
        self.top().items
    }

    /// Nesting depth, `Root` being 1.
    #[cfg(test)]
    fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Dotted path, e.g. `root.body.job.` or `root.body.job.grid` while the
    /// grid section is pending.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for frame in &self.frames {
            path.push_str(frame.section.name());
            path.push('.');
        }
        if let Some(pending) = self.pending {
            path.push_str(pending.name());
        }
        path
    }

    /// Name `section` as the pending child of the current section.
    pub fn enter(&mut self, section: Section) -> Result<(), ReportError> {
        if let Some(pending) = self.pending {
            return Err(self.error(format!(
                "cannot enter {} while {} is pending",
                section, pending
            )));
        }
        if section.parent() != Some(self.current()) {
            return Err(self.error(format!("{} is not a child of {}", section, self.current())));
        }
        debug!(from = %self.path(), to = %section, "Entering section");
        self.pending = Some(section);
        Ok(())
    }

    /// Settle the pending child, if any, returning it.
    pub fn settle(&mut self) -> Option<Section> {
        let section = self.pending.take()?;
        self.frames.push(Frame { section, items: 1 });
        debug!(path = %self.path(), "Settled section");
        Some(section)
    }

    /// Enter and settle `section` in one step.
    pub fn enter_scope(&mut self, section: Section) -> Result<(), ReportError> {
        self.enter(section)?;
        self.settle();
        Ok(())
    }

    /// Leave the current section, returning it.
    pub fn exit(&mut self) -> Result<Section, ReportError> {
        if self.pending.is_some() {
            return Err(self.error("cannot exit while a child is pending"));
        }
        if self.frames.len() <= 1 {
            return Err(self.error("cannot exit the root section"));
        }
        let frame = self.frames.pop().map(|f| f.section).unwrap_or(Section::Root);
        debug!(exited = %frame, path = %self.path(), "Exited section");
        Ok(frame)
    }

    /// A list item opened in the current section.
    pub fn item_open(&mut self) -> Result<(), ReportError> {
        if let Some(pending) = self.pending {
            return Err(self.error(format!("list item opened while {} is pending", pending)));
        }
        self.top_mut().items += 1;
        Ok(())
    }

    /// A list item closed in the current section.
    ///
    /// Returns the section that was exited because its enclosing item closed.
    pub fn item_close(&mut self) -> Result<Option<Section>, ReportError> {
        if let Some(pending) = self.pending {
            return Err(self.error(format!("list item closed while {} is pending", pending)));
        }
        let top = self.top_mut();
        top.items = top.items.saturating_sub(1);
        if top.items > 0 {
            return Ok(None);
        }

        let exited = self.exit()?;
        let parent = self.top_mut();
        if parent.items <= 1 {
            return Err(self.error(format!(
                "item counter underflow after leaving {}",
                exited
            )));
        }
        parent.items -= 1;
        Ok(Some(exited))
    }

    fn top(&self) -> &Frame {
        // frames always holds the root frame
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn error(&self, message: impl Into<String>) -> ReportError {
        ReportError::structure(self.path(), message)
    }
}
