//! Spec runner: nested blocks, hook replay, examples and the final report.

use crate::config::RunConfig;
use crate::context::ContextStack;
use crate::errors::BddResult;
use crate::expectation::Expectation;
use crate::failures::{FailureLog, FailureRecord};
use crate::report::{build_report, SpecReport};
use crate::sink::ReportSink;
use std::ops::{Deref, DerefMut};
use std::panic::Location;
use std::process;
use tracing::{debug, trace};

/// Owner of all state for one run: open blocks, recorded failures, the
/// example counter and the report sink.
///
/// ```ignore
/// let mut runner = SpecRunner::new(RunConfig::default());
/// runner.describe("stack", |s| {
///     s.it("starts empty", |s| {
///         s.expect(Vec::<u8>::new().len()).to_equal(0);
///     });
/// });
/// runner.emit()?;
/// ```
#[derive(Debug, Default)]
pub struct SpecRunner {
    stack: ContextStack,
    log: FailureLog,
    current_example: Option<String>,
    config: RunConfig,
    sink: ReportSink,
}

impl SpecRunner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the destination used by [`SpecRunner::emit`].
    pub fn with_sink(mut self, sink: ReportSink) -> Self {
        self.sink = sink;
        self
    }

    /// Open a block. The returned scope derefs to the runner and closes the
    /// block when dropped, on normal exit and while unwinding alike.
    pub fn enter_block(&mut self, description: impl Into<String>) -> BlockScope<'_> {
        let depth = self.stack.depth();
        let description = description.into();
        debug!(depth, description = %description, "entering block");
        self.stack.push(description);
        BlockScope {
            runner: self,
            depth,
        }
    }

    /// Run `body` inside a named block.
    pub fn describe<F>(&mut self, description: impl Into<String>, body: F)
    where
        F: FnOnce(&mut SpecRunner),
    {
        let mut scope = self.enter_block(description);
        body(&mut *scope);
    }

    /// Register the setup hook of the innermost open block, replacing any
    /// hook registered there before.
    ///
    /// # Panics
    ///
    /// Panics when no block is open.
    pub fn before_each<H>(&mut self, hook: H)
    where
        H: FnMut() + 'static,
    {
        trace!(depth = self.stack.depth(), "attaching before_each hook");
        if let Err(err) = self.stack.attach_hook(Box::new(hook)) {
            panic!("{}", err);
        }
    }

    /// Run one example: replay every open block's hook outer to inner, then
    /// run `body` with the example marked as current.
    pub fn it<F>(&mut self, description: impl Into<String>, body: F)
    where
        F: FnOnce(&mut SpecRunner),
    {
        let description = description.into();
        let hooks = self.stack.run_hooks();
        self.log.record_example();
        debug!(hooks, example = %description, "running example");

        let outer = self.current_example.replace(description);
        let mut scope = ExampleScope {
            runner: self,
            outer,
        };
        body(&mut *scope);
    }

    /// Wrap `value` for checking with a matcher.
    pub fn expect<T>(&mut self, value: T) -> Expectation<'_, T> {
        Expectation::new(self, value)
    }

    pub(crate) fn record_failure(&mut self, message: String, location: &'static Location<'static>) {
        let record = FailureRecord {
            message,
            example: self.current_example.clone().unwrap_or_default(),
            breadcrumb: self.stack.breadcrumb(),
            location: format!("{}:{}", location.file(), location.line()),
        };
        debug!(
            example = %record.example,
            location = %record.location,
            "expectation failed"
        );
        self.log.record(record);
    }

    /// Render the current failure log without consuming it.
    pub fn build_report(&self) -> SpecReport {
        build_report(&self.log, &self.config)
    }

    /// Write the report to the sink and reset the run.
    ///
    /// A failed run exits the process with status 1 unless the config is in
    /// debug mode.
    pub fn emit(&mut self) -> BddResult<SpecReport> {
        let report = self.build_report();
        let written = self.sink.write_report(&report.text);
        debug!(
            success = report.success,
            failures = self.log.len(),
            examples = self.log.examples(),
            "emitted spec report"
        );
        self.reset();
        written?;

        if !report.success && !self.config.debug {
            process::exit(report.exit_code());
        }
        Ok(report)
    }

    /// Clear open blocks, failures and the example count.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.log.reset();
        self.current_example = None;
    }

    /// Current nesting depth of open blocks.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Descriptions of the open blocks, outermost first.
    pub fn breadcrumb(&self) -> Vec<String> {
        self.stack.breadcrumb()
    }

    pub fn current_example(&self) -> Option<&str> {
        self.current_example.as_deref()
    }

    pub fn failures(&self) -> &FailureLog {
        &self.log
    }

    /// Examples run since the last reset.
    pub fn examples(&self) -> usize {
        self.log.examples()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

/// An open `describe` block. Dropping it restores the stack to the depth it
/// had before the block was entered.
pub struct BlockScope<'r> {
    runner: &'r mut SpecRunner,
    depth: usize,
}

impl Deref for BlockScope<'_> {
    type Target = SpecRunner;

    fn deref(&self) -> &SpecRunner {
        &*self.runner
    }
}

impl DerefMut for BlockScope<'_> {
    fn deref_mut(&mut self) -> &mut SpecRunner {
        &mut *self.runner
    }
}

impl Drop for BlockScope<'_> {
    fn drop(&mut self) {
        self.runner.stack.truncate(self.depth);
        debug!(depth = self.depth, "left block");
    }
}

/// A running example. Dropping it restores the example that was current
/// before, even when the body unwinds.
struct ExampleScope<'r> {
    runner: &'r mut SpecRunner,
    outer: Option<String>,
}

impl Deref for ExampleScope<'_> {
    type Target = SpecRunner;

    fn deref(&self) -> &SpecRunner {
        &*self.runner
    }
}

impl DerefMut for ExampleScope<'_> {
    fn deref_mut(&mut self) -> &mut SpecRunner {
        &mut *self.runner
    }
}

impl Drop for ExampleScope<'_> {
    fn drop(&mut self) {
        self.runner.current_example = self.outer.take();
    }
}
