//! Class scope tracking for the declaration extractor.
//!
//! A `ScopeStack` is explicit, per-file state passed through one extraction
//! pass. Frames record which class body the cursor is inside, at which brace
//! depth it was entered, and the current member access level. A class whose
//! opening brace has not been seen yet is held as a pending frame and
//! attached when a later line first opens a brace.

use serde::{Deserialize, Serialize};

/// C++ member access level inside a class or struct body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Public,
    Private,
    Protected,
}

/// One class scope: "inside class `class_name` with access `access`,
/// entered at brace depth `depth`".
#[derive(Debug, Clone)]
pub struct ScopeFrame {
    pub class_name: String,
    pub access: Access,
    /// Brace depth of the class body; member lines sit exactly here.
    pub depth: i64,
}

/// A class declaration whose body brace is still ahead.
#[derive(Debug, Clone)]
struct PendingFrame {
    class_name: String,
    access: Access,
    /// The declaration line itself carried the opening brace.
    attach_now: bool,
}

/// Stack of class scopes with deferred attach and pop-on-dedent rules.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
    pending: Option<PendingFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// The innermost class frame, if any.
    pub fn top(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    /// Name of the class whose body the cursor is inside.
    pub fn current_class(&self) -> Option<&str> {
        self.frames.last().map(|f| f.class_name.as_str())
    }

    pub fn in_class(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Whether a declaration made here is publicly visible: true at global
    /// or namespace scope, or when the enclosing class section is public.
    pub fn public_context(&self) -> bool {
        self.frames.last().map_or(true, |f| f.access == Access::Public)
    }

    /// Applies an access-specifier line (`public:` etc.) to the innermost
    /// frame. A no-op outside any class scope.
    pub fn set_access(&mut self, access: Access) {
        if let Some(frame) = self.frames.last_mut() {
            frame.access = access;
        }
    }

    /// Registers a class declaration whose body may open on this line
    /// (`attach_now`) or on a later line.
    pub fn defer(&mut self, class_name: &str, default_access: Access, attach_now: bool) {
        self.pending = Some(PendingFrame {
            class_name: class_name.to_string(),
            access: default_access,
            attach_now,
        });
    }

    /// Settles state after one line's brace delta: attaches a pending frame
    /// once a brace has opened, then pops frames the line dedented out of.
    pub fn after_line(&mut self, before_depth: i64, depth: i64, line_opened_brace: bool) {
        if let Some(pending) = self.pending.take() {
            let attach = pending.attach_now || (before_depth < depth && line_opened_brace);
            if attach {
                self.frames.push(ScopeFrame {
                    class_name: pending.class_name,
                    access: pending.access,
                    depth,
                });
            } else {
                self.pending = Some(pending);
            }
        }

        while self.frames.last().is_some_and(|f| depth < f.depth) {
            self.frames.pop();
        }
    }
}
