//! Downstream fixes applied to scan findings.

pub mod action_log;
pub mod annotate;

pub use action_log::{ActionLog, ActionLogEntry, JsonActionLog, MemoryActionLog, MAX_LOG_ENTRIES};
pub use annotate::{
    add_annotation, annotate_all, annotate_pending, insert_annotation, AnnotateOutcome,
    AnnotationSpec, BatchOutcome,
};
