//! Expectations: a value under test plus the matchers that check it.
//!
//! Matchers never panic on mismatch. A failing matcher appends one
//! [`FailureRecord`](crate::failures::FailureRecord) to the runner's log,
//! located at the matcher call in the caller's code, and the example keeps
//! running.

use crate::matcher::{describe_payload, payload_matches, rescue, DeepEq, Identity, Nullable};
use crate::runner::SpecRunner;
use std::any::Any;
use std::fmt::Debug;
use std::panic::Location;

/// A value bound to the runner it reports failures to.
///
/// Created by [`SpecRunner::expect`].
#[must_use = "an expectation does nothing until a matcher is called"]
pub struct Expectation<'r, T> {
    runner: &'r mut SpecRunner,
    value: T,
}

impl<'r, T> Expectation<'r, T> {
    pub(crate) fn new(runner: &'r mut SpecRunner, value: T) -> Self {
        Self { runner, value }
    }

    fn fail(self, message: String, location: &'static Location<'static>) {
        self.runner.record_failure(message, location);
    }
}

impl<'r, T: Identity + Debug> Expectation<'r, T> {
    /// The value is `expected`: the same allocation for `Box`, `Rc`, `Arc`
    /// and raw pointers, an equal value otherwise.
    #[track_caller]
    pub fn to_equal(self, expected: T) {
        if !self.value.identical(&expected) {
            let message = format!("expected: {:?}\n got: {:?}\n", expected, self.value);
            self.fail(message, Location::caller());
        }
    }

    /// The value is not `expected`.
    #[track_caller]
    pub fn to_not_equal(self, expected: T) {
        if self.value.identical(&expected) {
            let message = format!(" expected: {:?}\nto not be: {:?}\n", expected, self.value);
            self.fail(message, Location::caller());
        }
    }
}

impl<'r, T: Debug> Expectation<'r, T> {
    /// The value and `expected` have the same structure, field by field and
    /// element by element, regardless of the pointer types wrapping them.
    #[track_caller]
    pub fn to_deep_equal<U: Debug>(self, expected: U)
    where
        T: DeepEq<U>,
    {
        if !self.value.deep_eq(&expected) {
            let message = format!("expected: {:?}\nto deeply be: {:?}\n", expected, self.value);
            self.fail(message, Location::caller());
        }
    }
}

impl<'r, T: Nullable + Debug> Expectation<'r, T> {
    /// The value is an absent reference.
    #[track_caller]
    pub fn to_be_nil(self) {
        if !self.value.is_nil() {
            let message = format!("expected to be nil,\n but got: {:?}\n", self.value);
            self.fail(message, Location::caller());
        }
    }

    /// The value is a present reference.
    #[track_caller]
    pub fn to_not_be_nil(self) {
        if self.value.is_nil() {
            self.fail(
                "expected to not be nil,\n but got: nil\n".to_string(),
                Location::caller(),
            );
        }
    }
}

impl<'r, F: FnOnce()> Expectation<'r, F> {
    /// Calling the value panics with a payload equal to `expected`.
    #[track_caller]
    pub fn to_panic_with<E: Any + PartialEq + Debug>(self, expected: E) {
        let location = Location::caller();
        let Expectation { runner, value } = self;
        let payload = rescue(value);

        let matched = match payload.as_deref() {
            Some(actual) => payload_matches(actual, &expected),
            None => false,
        };

        if !matched {
            let message = format!(
                "expected panic: {:?}\n got: {}\n",
                expected,
                describe_payload(payload.as_deref())
            );
            runner.record_failure(message, location);
        }
    }

    /// Calling the value completes without panicking.
    #[track_caller]
    pub fn to_not_panic(self) {
        let location = Location::caller();
        let Expectation { runner, value } = self;

        if let Some(payload) = rescue(value) {
            let message = format!(
                "expected no panic,\n but got: {}\n",
                describe_payload(Some(&*payload))
            );
            runner.record_failure(message, location);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RunConfig;
    use crate::runner::SpecRunner;
    use std::panic::Location;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        age: u32,
    }

    crate::value_semantics!(Person);

    fn person(name: &str, age: u32) -> Person {
        Person {
            name: name.to_string(),
            age,
        }
    }

    fn messages(runner: &SpecRunner) -> Vec<String> {
        runner.failures().iter().map(|r| r.message.clone()).collect()
    }

    #[test]
    fn test_equal_records_one_failure() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        runner.describe("foo", |s| {
            s.describe("bar", |s| {
                s.it("is good", |s| {
                    s.expect(42).to_equal(42);
                    s.expect(24).to_equal(23);
                });
            });
        });

        assert_eq!(messages(&runner), vec!["expected: 23\n got: 24\n"]);
        let record = runner.failures().iter().next().unwrap();
        assert_eq!(record.breadcrumb, vec!["foo", "bar"]);
        assert_eq!(record.example, "is good");
    }

    #[test]
    fn test_location_is_the_matcher_call() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        let here = Location::caller();
        runner.expect("foo").to_equal("bar");

        let record = runner.failures().iter().next().unwrap();
        assert_eq!(record.location, format!("{}:{}", file!(), here.line() + 1));
    }

    #[test]
    fn test_not_equal() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        runner.expect("foo").to_not_equal("bar");
        assert!(runner.failures().is_empty());

        runner.expect(5).to_not_equal(5);
        assert_eq!(messages(&runner), vec![" expected: 5\nto not be: 5\n"]);
    }

    #[test]
    fn test_deep_equal_through_pointers() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        runner
            .expect(Box::new(person("john", 23)))
            .to_deep_equal(Rc::new(person("john", 23)));
        runner.expect("foo").to_deep_equal("foo");
        assert!(runner.failures().is_empty());

        runner
            .expect(person("john", 23))
            .to_deep_equal(person("john", 24));
        assert_eq!(
            messages(&runner),
            vec![
                "expected: Person { name: \"john\", age: 24 }\n\
                 to deeply be: Person { name: \"john\", age: 23 }\n"
            ]
        );
    }

    #[test]
    fn test_equal_is_identity_for_shared_pointers() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        let john = Rc::new(person("john", 23));
        let twin = Rc::new(person("john", 23));

        runner.expect(john.clone()).to_equal(john.clone());
        runner.expect(john.clone()).to_not_equal(twin.clone());
        runner.expect(john.clone()).to_deep_equal(twin.clone());
        assert!(runner.failures().is_empty());

        runner.expect(john.clone()).to_equal(twin.clone());
        runner.expect(john.clone()).to_not_equal(john.clone());
        assert_eq!(
            messages(&runner),
            vec![
                "expected: Person { name: \"john\", age: 23 }\n got: Person { name: \"john\", age: 23 }\n",
                " expected: Person { name: \"john\", age: 23 }\nto not be: Person { name: \"john\", age: 23 }\n"
            ]
        );
    }

    #[test]
    fn test_deep_equal_mismatches() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        runner.expect(f64::INFINITY).to_deep_equal(f64::NAN);
        runner.expect(f64::NAN).to_deep_equal(f64::NAN);
        runner.expect(Some(1)).to_deep_equal(None::<i32>);
        runner
            .expect(Rc::new(person("john", 23)))
            .to_deep_equal(Box::new(person("jane", 23)));

        assert_eq!(
            messages(&runner),
            vec![
                "expected: NaN\nto deeply be: inf\n",
                "expected: NaN\nto deeply be: NaN\n",
                "expected: None\nto deeply be: Some(1)\n",
                "expected: Person { name: \"jane\", age: 23 }\n\
                 to deeply be: Person { name: \"john\", age: 23 }\n"
            ]
        );
    }

    #[test]
    fn test_nil_matchers() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        let missing: Option<Box<Person>> = None;
        let present = Some(Box::new(person("john", 23)));

        runner.expect(missing).to_be_nil();
        runner.expect(&present).to_not_be_nil();
        runner.expect(()).to_be_nil();
        runner.expect(true).to_not_be_nil();
        assert!(runner.failures().is_empty());

        runner.expect(7_i32).to_be_nil();
        runner.expect(None::<u8>).to_not_be_nil();
        assert_eq!(
            messages(&runner),
            vec![
                "expected to be nil,\n but got: 7\n",
                "expected to not be nil,\n but got: nil\n"
            ]
        );
    }

    #[test]
    fn test_panic_with() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        runner.expect(|| panic!("foobar!")).to_panic_with("foobar!");
        runner
            .expect(|| panic!("{}-{}", "foo", "bar"))
            .to_panic_with("foo-bar".to_string());
        assert!(runner.failures().is_empty());

        runner.expect(|| panic!("nope")).to_panic_with("foobar!");
        runner.expect(|| {}).to_panic_with("foobar!");
        assert_eq!(
            messages(&runner),
            vec![
                "expected panic: \"foobar!\"\n got: \"nope\"\n",
                "expected panic: \"foobar!\"\n got: nil\n"
            ]
        );
    }

    #[test]
    fn test_not_panic() {
        let mut runner = SpecRunner::new(RunConfig::debug());
        runner.expect(|| {}).to_not_panic();
        assert!(runner.failures().is_empty());

        runner.expect(|| panic!("boom")).to_not_panic();
        assert_eq!(
            messages(&runner),
            vec!["expected no panic,\n but got: \"boom\"\n"]
        );
    }
}
