//! Cache-validity record for in-memory payloads.
//!
//! Every node tracks which stored image its memory corresponds to. A read
//! request matching that image is satisfied without touching storage; any
//! mutation marks the record dirty so the next read goes back to disk.

use ehm_core::StateTag;

/// Report step meaning "no checkpoint loaded or written yet".
pub const NO_REPORT_STEP: i32 = -1;

/// Which stored image, if any, the in-memory payload currently mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// Checkpoint step of the last synchronized image.
    pub report_step: i32,
    /// State family of that image.
    pub state_tag: StateTag,
    /// True when memory may differ from every stored image.
    pub dirty: bool,
}

impl Freshness {
    /// Record for freshly allocated or released memory.
    pub fn undefined() -> Freshness {
        Freshness {
            report_step: NO_REPORT_STEP,
            state_tag: StateTag::Undefined,
            dirty: true,
        }
    }

    /// True when a request for `(report_step, state_tag)` is already
    /// satisfied by memory.
    pub fn satisfies(&self, report_step: i32, state_tag: StateTag) -> bool {
        !self.dirty && self.report_step == report_step && self.state_tag == state_tag
    }

    /// Marks memory in sync with the image at `(report_step, state_tag)`.
    pub fn mark_synced(&mut self, report_step: i32, state_tag: StateTag) {
        self.report_step = report_step;
        self.state_tag = state_tag;
        self.dirty = false;
    }

    /// Marks memory modified relative to every stored image.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Default for Freshness {
    fn default() -> Freshness {
        Freshness::undefined()
    }
}
