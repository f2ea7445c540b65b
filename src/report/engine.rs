//! Extraction engine: turns scanner events into report records.
//!
//! The engine is a [`Sink`] that drives a [`PathTracker`] and a
//! [`Recognizer`]. Section names move the tracker; record lines are only
//! recognized while the tracker is settled in the section they belong to, so
//! look-alike text elsewhere in the document is ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::error::ReportError;
use super::model::{Extraction, Phase, Record, ShownTask, Task, TradeGroup};
use super::path::{PathTracker, Section};
use super::recognizer::Recognizer;
use super::scanner::{Flow, Scanner, Sink};

const JOB_MARKER: &str = "Job [";
const COMPUTATIONAL_MARKER: &str = "Computational = [";
const SPAN_MARKER: &str = "Start = [";
const TRADE_GROUP_MARKER: &str = "#TradeGroup#";
const OMITTED_MARKER: &str = "additional entries omitted";

/// How much of a document to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Trade groups and tasks.
    #[default]
    Tasks,
    /// Trade groups only; the scan stops when the grid section starts.
    TradeGroupsOnly,
    /// Job header and phase spans only.
    Timeline,
}

/// Number of completed tasks to show before the run stops.
///
/// Shared by every document of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLimit {
    pub remaining: usize,
    /// Only tasks of trade groups with this pricer count.
    pub pricer: Option<String>,
}

impl TaskLimit {
    pub fn new(count: usize, pricer: Option<String>) -> Self {
        Self {
            remaining: count,
            pricer,
        }
    }

    fn accepts(&self, trade_group: &TradeGroup) -> bool {
        self.remaining > 0
            && self
                .pricer
                .as_deref()
                .map_or(true, |pricer| pricer == trade_group.pricer)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub scope: Scope,
    /// Report to borrow trade groups from when a report has none.
    pub alt_trade_groups: Option<PathBuf>,
    pub limit: Option<TaskLimit>,
}

impl ExtractOptions {
    pub fn with_scope(scope: Scope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }
}

/// State that lives for one document.
#[derive(Debug, Default)]
struct Document {
    extraction: Extraction,
    signature: Option<String>,
    open_task: Option<Task>,
    omitted_credits: u32,
}

/// Extracts records from report documents, one at a time.
#[derive(Debug)]
pub struct Extractor {
    scope: Scope,
    alt_trade_groups: Option<PathBuf>,
    alt_cache: Option<BTreeMap<String, TradeGroup>>,
    limit: Option<TaskLimit>,
    recognizer: Recognizer,
    tracker: PathTracker,
    doc: Document,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Result<Self, ReportError> {
        Ok(Self {
            scope: options.scope,
            alt_trade_groups: options.alt_trade_groups,
            alt_cache: None,
            limit: options.limit.filter(|limit| limit.remaining > 0),
            recognizer: Recognizer::new()?,
            tracker: PathTracker::new(),
            doc: Document::default(),
        })
    }

    /// The run's display limit, if one is left.
    pub fn limit(&self) -> Option<&TaskLimit> {
        self.limit.as_ref()
    }

    /// Extract one document.
    ///
    /// Line breaks are treated as spaces. Per-document state is cleared
    /// afterwards whether extraction succeeded or not.
    pub fn extract(&mut self, text: &str) -> Result<Extraction, ReportError> {
        let outcome = self.run(text);
        let extraction = std::mem::take(&mut self.doc.extraction);
        self.reset();
        outcome.map(|()| extraction)
    }

    /// Read and extract the document at `path`.
    pub fn extract_file(&mut self, path: &Path) -> Result<Extraction, ReportError> {
        let text = read_report(path)?;
        self.extract(&text)
    }

    /// Clear all per-document state.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.recognizer.reset();
        self.doc = Document::default();
    }

    fn run(&mut self, text: &str) -> Result<(), ReportError> {
        let text = text.replace(['\r', '\n'], " ");
        let flow = Scanner::new().advance(self, &text)?;

        if let Some(task) = self.doc.open_task.take() {
            warn!(
                trade_group = %task.trade_group_id,
                "Dropping task without computational duration"
            );
        }
        if self.doc.omitted_credits > 0 {
            debug!(
                missing = self.doc.omitted_credits,
                "Fewer commented entries than reported omitted"
            );
        }
        if flow == Flow::Continue
            && (self.tracker.current() != Section::Root || !self.tracker.is_settled())
        {
            warn!(path = %self.tracker.path(), "Report ended inside a section");
        }
        Ok(())
    }

    fn on_settled(&mut self, section: Section) -> Result<Flow, ReportError> {
        match section {
            Section::TradeGroup => self.doc.extraction.has_trade_group_section = true,
            Section::Grid => match self.scope {
                Scope::TradeGroupsOnly => return Ok(Flow::Stop),
                Scope::Tasks if !self.doc.extraction.has_trade_group_section => {
                    self.borrow_trade_groups()?
                }
                _ => {}
            },
            _ => {}
        }
        Ok(Flow::Continue)
    }

    /// Copy trade groups in from the alternate report, or warn that there
    /// are none.
    fn borrow_trade_groups(&mut self) -> Result<(), ReportError> {
        let Some(path) = self.alt_trade_groups.clone() else {
            warn!("Report has no trade group section; pricers will be unknown");
            return Ok(());
        };

        if self.alt_cache.is_none() {
            info!(path = %path.display(), "Parsing alternate report for trade groups");
            let mut alternate = Extractor::new(ExtractOptions::with_scope(Scope::TradeGroupsOnly))?;
            let extraction = alternate.extract_file(&path)?;
            self.alt_cache = Some(extraction.trade_groups);
        }

        if let Some(cache) = &self.alt_cache {
            for (id, trade_group) in cache {
                self.doc
                    .extraction
                    .trade_groups
                    .entry(id.clone())
                    .or_insert_with(|| trade_group.clone());
            }
        }
        Ok(())
    }

    fn record_span(&mut self, phase: Phase, text: &str) -> Result<(), ReportError> {
        match self.recognizer.span(text) {
            Ok(span) => {
                self.doc
                    .extraction
                    .spans
                    .insert(phase.key().to_string(), span);
                self.doc.extraction.records.push(Record::Phase(phase, span));
            }
            Err(err) if self.scope == Scope::Timeline => return Err(err),
            Err(err) => debug!(%err, "Ignoring span"),
        }
        Ok(())
    }

    fn pending_text(&mut self, pending: Section, text: &str) -> Result<(), ReportError> {
        if pending == Section::Job && text.contains(COMPUTATIONAL_MARKER) {
            let id = self.doc.extraction.job.as_ref().map_or("?", |job| job.id.as_str());
            info!(job = id, summary = text, "Job summary");
            self.doc.extraction.summary = Some(text.to_string());
            self.doc
                .extraction
                .records
                .push(Record::Summary(text.to_string()));
        }

        let phase = match pending {
            Section::Job => Phase::Job,
            Section::Provisioning => Phase::Provisioning,
            Section::Grid => Phase::Compute,
            Section::Rws => Phase::ResultWrite,
            _ => return Ok(()),
        };
        if text.contains(SPAN_MARKER) {
            self.record_span(phase, text)?;
        }
        Ok(())
    }

    fn settled_text(&mut self, text: &str) -> Result<Flow, ReportError> {
        let child = match self.tracker.current() {
            Section::Body if text.contains(JOB_MARKER) => {
                let header = self.recognizer.job_header(text)?;
                self.doc.signature = Some(format!("{}#", header.id));
                self.doc.extraction.records.push(Record::Job(header.clone()));
                self.doc.extraction.job = Some(header);
                Some(Section::Job)
            }
            Section::Job => match text {
                "Job Details" => Some(Section::JobDetails),
                "Component [Grid]," => Some(Section::Grid),
                "Component [CnC]," => Some(Section::Cnc),
                "Component [RWS]," => Some(Section::Rws),
                _ => None,
            },
            Section::JobDetails if text == "TradeGroup" => Some(Section::TradeGroup),
            Section::Cnc if text == "Provisioning," => Some(Section::Provisioning),
            Section::TradeGroup
                if self.scope != Scope::Timeline && text.contains(TRADE_GROUP_MARKER) =>
            {
                let line = self.recognizer.trade_group(text)?;
                self.doc
                    .extraction
                    .trade_groups
                    .insert(line.id.clone(), TradeGroup::from(&line));
                self.doc.extraction.records.push(Record::TradeGroup(line));
                None
            }
            Section::Grid if self.scope == Scope::Tasks => return self.grid_text(text),
            _ => None,
        };

        if let Some(section) = child {
            self.tracker.enter(section)?;
        }
        Ok(Flow::Continue)
    }

    fn grid_text(&mut self, text: &str) -> Result<Flow, ReportError> {
        let signature = self
            .doc
            .signature
            .as_deref()
            .ok_or_else(|| self.structure("job id not found before grid tasks"))?;

        if text.contains(signature) {
            self.open_task(text)?;
        } else if text.contains(COMPUTATIONAL_MARKER) {
            return self.complete_task(text);
        } else if text.contains(OMITTED_MARKER) {
            match self.recognizer.omitted(text) {
                Some(count) => {
                    debug!(count, "Replaying omitted tasks");
                    self.doc.omitted_credits = count;
                    self.doc.extraction.omitted_declared += count;
                    self.doc.extraction.records.push(Record::Omitted(count));
                }
                None => warn!("Cannot parse omitted entries: {}", text),
            }
        }
        Ok(Flow::Continue)
    }

    fn open_task(&mut self, text: &str) -> Result<(), ReportError> {
        if self.doc.open_task.is_some() {
            return Err(self.structure("computational duration not found for previous task"));
        }

        let line = self.recognizer.task(text)?;
        let extraction = &mut self.doc.extraction;
        if !extraction.trade_groups.contains_key(&line.trade_group_id) {
            if extraction.has_trade_group_section {
                return Err(self.structure(format!(
                    "trade group {} of task is not in Job Details",
                    line.trade_group_id
                )));
            }
            extraction.trade_groups.insert(
                line.trade_group_id.clone(),
                TradeGroup::unknown(line.trade_group_id.clone()),
            );
        }

        let mut task = Task::open(&line);
        (task.engine, task.num_processors) = self.recognizer.task_resources(text);
        self.doc.extraction.records.push(Record::TaskStart(line));
        self.doc.open_task = Some(task);
        Ok(())
    }

    fn complete_task(&mut self, text: &str) -> Result<Flow, ReportError> {
        let completion = self.recognizer.completion(text)?;
        let Some(mut task) = self.doc.open_task.take() else {
            return Err(self.structure(format!(
                "task not found before computational duration: {}",
                text
            )));
        };

        task.compute_time = completion.compute_time;
        task.start = Some(completion.start.clone());
        task.finish = Some(completion.finish.clone());
        let (engine, processors) = self.recognizer.task_resources(text);
        task.engine = task.engine.or(engine);
        task.num_processors = task.num_processors.or(processors);
        self.doc
            .extraction
            .records
            .push(Record::Completion(completion));

        let Some(trade_group) = self
            .doc
            .extraction
            .trade_groups
            .get_mut(&task.trade_group_id)
        else {
            return Err(self.structure(format!(
                "trade group {} disappeared before its task completed",
                task.trade_group_id
            )));
        };

        let mut flow = Flow::Continue;
        if let Some(limit) = self.limit.as_mut().filter(|limit| limit.accepts(trade_group)) {
            self.doc
                .extraction
                .shown
                .push(ShownTask::new(trade_group, &task));
            limit.remaining -= 1;
            if limit.remaining == 0 {
                debug!("Display limit reached");
                self.doc.extraction.stopped = true;
                flow = Flow::Stop;
            }
        }
        trade_group.tasks.push(task);
        Ok(flow)
    }

    fn structure(&self, message: impl Into<String>) -> ReportError {
        ReportError::structure(self.tracker.path(), message)
    }
}

impl Sink for Extractor {
    fn open(&mut self, tag: &str) -> Result<Flow, ReportError> {
        match tag {
            "body" => {
                if self.tracker.current() != Section::Root || !self.tracker.is_settled() {
                    return Err(self.structure("unexpected <body>"));
                }
                self.tracker.enter_scope(Section::Body)?;
            }
            "li" => self.tracker.item_open()?,
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn close(&mut self, tag: &str) -> Result<Flow, ReportError> {
        match tag {
            "body" => {
                if self.tracker.current() != Section::Body {
                    return Err(self.structure("unexpected </body>"));
                }
                self.tracker.exit()?;
            }
            "a" => {
                if let Some(section) = self.tracker.settle() {
                    return self.on_settled(section);
                }
            }
            "li" => {
                if let Some(section) = self.tracker.item_close()? {
                    debug!(%section, path = %self.tracker.path(), "Left section");
                }
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn text(&mut self, data: &str) -> Result<Flow, ReportError> {
        let text = data.trim();
        if text.is_empty() {
            return Ok(Flow::Continue);
        }
        match self.tracker.pending() {
            Some(pending) => {
                self.pending_text(pending, text)?;
                Ok(Flow::Continue)
            }
            None => self.settled_text(text),
        }
    }

    fn comment(&mut self, data: &str) -> Result<Flow, ReportError> {
        if self.scope != Scope::Tasks
            || self.tracker.current() != Section::Grid
            || !self.tracker.is_settled()
        {
            return Ok(Flow::Continue);
        }
        if self.doc.omitted_credits == 0 {
            warn!("More commented entries than reported omitted: {}", data.trim());
            return Ok(Flow::Continue);
        }

        self.doc.omitted_credits -= 1;
        self.doc.extraction.omitted_replayed += 1;
        Scanner::new().advance(self, data)
    }
}

/// Read a report document from disk.
pub fn read_report(path: &Path) -> Result<String, ReportError> {
    fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
