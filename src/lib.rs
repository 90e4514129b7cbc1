//! Behavior-driven spec DSL.
//!
//! Specs are declared as nested `describe` blocks holding `before_each`
//! hooks and `it` examples. Examples check values with `expect(..)` matchers;
//! failing matchers are recorded rather than aborting, and the run ends with
//! a colored report.
//!
//! ## Usage
//!
//! ```ignore
//! use layered_bdd::{RunConfig, SpecRunner};
//!
//! let mut runner = SpecRunner::new(RunConfig::default());
//! runner.describe("matchers", |s| {
//!     s.describe("equals", |s| {
//!         s.it("compares primitives", |s| {
//!             s.expect(42).to_equal(42);
//!         });
//!     });
//! });
//! runner.emit()?;
//! ```
//!
//! ## Modules
//!
//! - [`runner`] - Block nesting, hook replay, examples and report emission
//! - [`context`] - The stack of open blocks and their hooks
//! - [`expectation`] - Matchers over a value under test
//! - [`matcher`] - Nil detection, panic capture and structural comparison
//! - [`failures`] - Recorded failures and the example count
//! - [`report`] - Pass/fail report building
//! - [`formatter`] - Report text rendering
//! - [`sink`] - Report destinations
//! - [`config`] - Run configuration
//! - [`errors`] - Error types

pub mod config;
pub mod context;
pub mod errors;
pub mod expectation;
pub mod failures;
pub mod formatter;
pub mod matcher;
pub mod report;
pub mod runner;
pub mod sink;

pub use config::RunConfig;
pub use context::{Context, ContextStack, Hook};
pub use errors::{BddError, BddResult};
pub use expectation::Expectation;
pub use failures::{FailureLog, FailureRecord};
pub use matcher::{rescue, DeepEq, Identity, Nullable};
pub use report::{build_report, SpecReport};
pub use runner::{BlockScope, SpecRunner};
pub use sink::{CapturedOutput, ReportSink};
