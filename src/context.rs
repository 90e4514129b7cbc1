//! Nesting of `describe` blocks and their setup hooks.

use crate::errors::{BddError, BddResult};
use std::fmt;

/// A setup routine replayed before every example nested under its block.
pub type Hook = Box<dyn FnMut()>;

/// One nesting level of a `describe` block.
pub struct Context {
    /// Block description, as passed to `describe`.
    pub description: String,
    /// Hook registered with `before_each` at this level, if any.
    pub before_each: Option<Hook>,
}

impl Context {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            before_each: None,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("description", &self.description)
            .field("before_each", &self.before_each.is_some())
            .finish()
    }
}

/// Stack of open blocks, outermost first.
///
/// Depth always equals the current nesting depth of `describe` blocks; the
/// runner restores it on every exit path of a block body.
#[derive(Debug, Default)]
pub struct ContextStack {
    contexts: Vec<Context>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, description: impl Into<String>) {
        self.contexts.push(Context::new(description));
    }

    pub fn pop(&mut self) -> Option<Context> {
        self.contexts.pop()
    }

    /// Drop every level above `depth`.
    pub fn truncate(&mut self, depth: usize) {
        self.contexts.truncate(depth);
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    pub fn clear(&mut self) {
        self.contexts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Context> {
        self.contexts.iter()
    }

    /// Snapshot of the block descriptions, outermost first.
    pub fn breadcrumb(&self) -> Vec<String> {
        self.contexts
            .iter()
            .map(|context| context.description.clone())
            .collect()
    }

    /// Set the hook of the innermost block, replacing any earlier one.
    pub fn attach_hook(&mut self, hook: Hook) -> BddResult<()> {
        let top = self
            .contexts
            .last_mut()
            .ok_or(BddError::NoEnclosingBlock)?;
        top.before_each = Some(hook);
        Ok(())
    }

    /// Invoke every registered hook, outer to inner. Returns how many ran.
    pub fn run_hooks(&mut self) -> usize {
        let mut ran = 0;
        for context in &mut self.contexts {
            if let Some(hook) = context.before_each.as_mut() {
                hook();
                ran += 1;
            }
        }
        ran
    }
}
