use crate::error::{CoddyError, Result};
use crate::paths;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

static PHASE_HEADING_RE: OnceLock<Regex> = OnceLock::new();
static TASK_LINE_RE: OnceLock<Regex> = OnceLock::new();

/// `### Phase <free text>` on a trimmed line. "Phase" is case-sensitive and
/// exactly one space separates it from the hashes. Group 1 is the title.
fn phase_heading_re() -> &'static Regex {
    PHASE_HEADING_RE.get_or_init(|| Regex::new(r"^### (Phase.*)$").unwrap())
}

/// `-[ ]text`, `- [x] text`, `- [X]  text` on a trimmed line. Group 1 is the
/// single mark character (`x`, `X` or one whitespace char), group 2 the text.
fn task_line_re() -> &'static Regex {
    TASK_LINE_RE.get_or_init(|| Regex::new(r"^-\s*\[([xX\s])\]\s*(.*)$").unwrap())
}

/// Text before the first heading, reduced to the form `render` writes back:
/// trailing whitespace replaced by one blank line, or nothing at all.
fn normalize_preamble(raw: &str) -> String {
    let trimmed = raw.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n\n")
    }
}

fn parse_task_line(line: &str) -> Option<Task> {
    let caps = task_line_re().captures(line)?;
    let text = caps[2].trim();
    if text.is_empty() {
        return None;
    }
    Some(Task {
        text: text.to_string(),
        completed: caps[1].eq_ignore_ascii_case("x"),
    })
}

// ---------------------------------------------------------------------------
// Task / Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }

    fn checkbox(&self) -> &'static str {
        if self.completed {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub title: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Phase {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tasks: Vec::new(),
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.tasks.iter().filter(|t| t.completed).count(),
            total: self.tasks.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Whole-number percentage; an empty phase counts as 0%.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u32
    }

    pub fn is_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} completed", self.completed, self.total)
    }
}

// ---------------------------------------------------------------------------
// RoadmapDocument
// ---------------------------------------------------------------------------

/// In-memory form of a `roadmap.md` checklist.
///
/// Parsing is lenient and line oriented. Only the preamble, phase headings and
/// task lines survive a parse/render cycle: prose between tasks of a phase is
/// dropped on render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoadmapDocument {
    /// Text before the first phase heading, trailing whitespace normalized
    /// to a single blank line.
    #[serde(default)]
    pub preamble: String,
    #[serde(default)]
    pub phases: Vec<Phase>,
}

impl RoadmapDocument {
    /// Parse roadmap markdown. Never fails; unrecognized lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut preamble_end = text.len();
        let mut phases: Vec<Phase> = Vec::new();
        let mut offset = 0;

        for raw in text.split_inclusive('\n') {
            let start = offset;
            offset += raw.len();
            let line = raw.trim();

            if let Some(caps) = phase_heading_re().captures(line) {
                if phases.is_empty() {
                    preamble_end = start;
                }
                phases.push(Phase::new(caps[1].trim()));
                continue;
            }

            // Before the first heading everything belongs to the preamble slice.
            let Some(current) = phases.last_mut() else {
                continue;
            };
            if let Some(task) = parse_task_line(line) {
                current.tasks.push(task);
            }
        }

        Self {
            preamble: normalize_preamble(&text[..preamble_end]),
            phases,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        let preamble = self.preamble.trim_end();
        if !preamble.is_empty() {
            out.push_str(preamble);
            out.push_str("\n\n");
        }

        for (i, phase) in self.phases.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str("### ");
            out.push_str(&phase.title);
            out.push('\n');
            for task in &phase.tasks {
                out.push_str("- ");
                out.push_str(task.checkbox());
                out.push(' ');
                out.push_str(&task.text);
                out.push('\n');
            }
        }

        out
    }

    pub fn task(&self, phase_index: usize, task_index: usize) -> Option<&Task> {
        self.phases.get(phase_index)?.tasks.get(task_index)
    }

    /// Flip the completion flag of a task addressed by zero-based indices.
    pub fn toggle_task(&mut self, phase_index: usize, task_index: usize) -> Result<()> {
        let task = self
            .phases
            .get_mut(phase_index)
            .and_then(|p| p.tasks.get_mut(task_index))
            .ok_or(CoddyError::IndexOutOfRange {
                phase: phase_index,
                task: task_index,
            })?;
        task.completed = !task.completed;
        tracing::debug!(
            phase = phase_index,
            task = task_index,
            completed = task.completed,
            "toggled roadmap task"
        );
        Ok(())
    }

    /// Mark the first task whose text equals `text` (trimmed) as completed.
    /// Later duplicates are left alone. Returns false when nothing matched.
    pub fn complete_task_by_text(&mut self, text: &str) -> bool {
        let needle = text.trim();
        for phase in &mut self.phases {
            if let Some(task) = phase.tasks.iter_mut().find(|t| t.text == needle) {
                task.completed = true;
                tracing::debug!(task = %needle, phase = %phase.title, "completed roadmap task");
                return true;
            }
        }
        tracing::debug!(task = %needle, "no roadmap task matched");
        false
    }

    /// First incomplete task in document order, with its indices.
    pub fn next_task(&self) -> Option<(usize, usize, &Task)> {
        self.phases.iter().enumerate().find_map(|(p, phase)| {
            phase
                .tasks
                .iter()
                .enumerate()
                .find(|(_, t)| !t.completed)
                .map(|(t, task)| (p, t, task))
        })
    }

    pub fn progress(&self) -> Progress {
        self.phases
            .iter()
            .map(Phase::progress)
            .fold(Progress::default(), |acc, p| Progress {
                completed: acc.completed + p.completed,
                total: acc.total + p.total,
            })
    }
}

impl fmt::Display for RoadmapDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

pub fn load_roadmap(root: &Path) -> Result<RoadmapDocument> {
    let path = paths::roadmap_path(root);
    if !path.exists() {
        return Err(CoddyError::RoadmapNotFound(path));
    }
    let data = std::fs::read_to_string(&path)?;
    let doc = RoadmapDocument::parse(&data);
    tracing::debug!(path = %path.display(), phases = doc.phases.len(), "loaded roadmap");
    Ok(doc)
}

pub fn save_roadmap(root: &Path, doc: &RoadmapDocument) -> Result<()> {
    let path = paths::roadmap_path(root);
    crate::io::atomic_write(&path, &doc.render())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
