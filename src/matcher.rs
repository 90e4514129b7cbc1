//! Comparison primitives behind the expectation matchers.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::rc::{self, Rc};
use std::sync::{self, Arc};

/// Values that can represent an absent reference.
pub trait Nullable {
    fn is_nil(&self) -> bool;
}

/// The unit value is the untyped absent value.
impl Nullable for () {
    fn is_nil(&self) -> bool {
        true
    }
}

impl<T> Nullable for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T: ?Sized> Nullable for *const T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Nullable for *mut T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Nullable for rc::Weak<T> {
    fn is_nil(&self) -> bool {
        self.strong_count() == 0
    }
}

impl<T: ?Sized> Nullable for sync::Weak<T> {
    fn is_nil(&self) -> bool {
        self.strong_count() == 0
    }
}

impl<T: Nullable + ?Sized> Nullable for &T {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nullable + ?Sized> Nullable for &mut T {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

macro_rules! never_nil {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Nullable for $ty {
                fn is_nil(&self) -> bool {
                    false
                }
            }
        )*
    };
}

never_nil!(
    bool, char, str, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64,
);

impl<T: ?Sized> Nullable for Box<T> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T: ?Sized> Nullable for Rc<T> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T: ?Sized> Nullable for Arc<T> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T> Nullable for Vec<T> {
    fn is_nil(&self) -> bool {
        false
    }
}

/// Run `f`, capturing the payload of any panic it raises.
///
/// Returns `None` when `f` completes normally. A panic already unwinding
/// through the caller is left untouched.
pub fn rescue<F: FnOnce()>(f: F) -> Option<Box<dyn Any + Send>> {
    panic::catch_unwind(AssertUnwindSafe(f)).err()
}

/// Text of a `panic!("...")` payload, if the payload is a string.
pub fn payload_message(payload: &dyn Any) -> Option<&str> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Some(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Some(s.as_str())
    } else {
        None
    }
}

/// Check a captured payload against an expected value.
///
/// Payloads of the expected type compare with `==`; string payloads compare
/// by text so `&str` and `String` are interchangeable.
pub fn payload_matches<E: Any + PartialEq>(payload: &dyn Any, expected: &E) -> bool {
    if let Some(actual) = payload.downcast_ref::<E>() {
        return actual == expected;
    }
    match (payload_message(payload), payload_message(expected)) {
        (Some(actual), Some(expected)) => actual == expected,
        _ => false,
    }
}

/// Render a captured payload (or its absence) for failure messages.
pub fn describe_payload(payload: Option<&(dyn Any + Send)>) -> String {
    match payload {
        None => "nil".to_string(),
        Some(payload) => match payload_message(payload) {
            Some(message) => format!("{:?}", message),
            None => "<non-string panic payload>".to_string(),
        },
    }
}

/// Equality as `to_equal` sees it: owning pointers compare by address,
/// values compare with `==`.
///
/// Plain references delegate to their referent, so `&str` still compares by
/// text. Value types opt in with [`value_semantics!`](crate::value_semantics).
pub trait Identity {
    fn identical(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identity for Box<T> {
    fn identical(&self, other: &Self) -> bool {
        ptr::eq(&**self, &**other)
    }
}

impl<T: ?Sized> Identity for Rc<T> {
    fn identical(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    fn identical(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for rc::Weak<T> {
    fn identical(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: ?Sized> Identity for sync::Weak<T> {
    fn identical(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: ?Sized> Identity for *const T {
    fn identical(&self, other: &Self) -> bool {
        ptr::eq(*self, *other)
    }
}

impl<T: ?Sized> Identity for *mut T {
    fn identical(&self, other: &Self) -> bool {
        ptr::eq(*self as *const T, *other as *const T)
    }
}

impl<T: Identity + ?Sized> Identity for &T {
    fn identical(&self, other: &Self) -> bool {
        (**self).identical(*other)
    }
}

impl<T: Identity> Identity for Option<T> {
    fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.identical(b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Recursive structural equality for `to_deep_equal`.
///
/// Looks through `Box`, `Rc`, `Arc` and references on either side, walks
/// options, sequences, maps and tuples element by element, and compares
/// leaves with `==`. Both sides must have the same shape at compile time, so
/// an option never equals its payload and an enum never equals its name:
///
/// ```compile_fail
/// use layered_bdd::{RunConfig, SpecRunner};
/// let mut runner = SpecRunner::new(RunConfig::debug());
/// runner.expect(Some(1)).to_deep_equal(1);
/// ```
///
/// ```compile_fail
/// use layered_bdd::{RunConfig, SpecRunner};
/// let mut runner = SpecRunner::new(RunConfig::debug());
/// runner.expect(None::<u8>).to_deep_equal(());
/// ```
pub trait DeepEq<Rhs: ?Sized = Self> {
    fn deep_eq(&self, other: &Rhs) -> bool;
}

/// Give types `==`-based [`Identity`] and [`DeepEq`], making them usable as
/// leaves of `to_equal` and `to_deep_equal`.
///
/// ```ignore
/// #[derive(Debug, PartialEq)]
/// struct Person { name: String, age: u32 }
/// layered_bdd::value_semantics!(Person);
/// ```
#[macro_export]
macro_rules! value_semantics {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::matcher::Identity for $ty {
                fn identical(&self, other: &Self) -> bool {
                    self == other
                }
            }

            impl $crate::matcher::DeepEq for $ty {
                fn deep_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

value_semantics!(
    (), bool, char, str, String, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
    f32, f64,
);

macro_rules! deep_eq_through {
    ($($lhs:ident),*) => {
        $(
            impl<T: DeepEq<U> + ?Sized, U: ?Sized> DeepEq<Box<U>> for $lhs<T> {
                fn deep_eq(&self, other: &Box<U>) -> bool {
                    (**self).deep_eq(&**other)
                }
            }

            impl<T: DeepEq<U> + ?Sized, U: ?Sized> DeepEq<Rc<U>> for $lhs<T> {
                fn deep_eq(&self, other: &Rc<U>) -> bool {
                    (**self).deep_eq(&**other)
                }
            }

            impl<T: DeepEq<U> + ?Sized, U: ?Sized> DeepEq<Arc<U>> for $lhs<T> {
                fn deep_eq(&self, other: &Arc<U>) -> bool {
                    (**self).deep_eq(&**other)
                }
            }

            impl<'b, T: DeepEq<U> + ?Sized, U: ?Sized> DeepEq<&'b U> for $lhs<T> {
                fn deep_eq(&self, other: &&'b U) -> bool {
                    (**self).deep_eq(&**other)
                }
            }
        )*
    };
}

deep_eq_through!(Box, Rc, Arc);

impl<'a, T: DeepEq<U> + ?Sized, U: ?Sized> DeepEq<Box<U>> for &'a T {
    fn deep_eq(&self, other: &Box<U>) -> bool {
        (**self).deep_eq(&**other)
    }
}

impl<'a, T: DeepEq<U> + ?Sized, U: ?Sized> DeepEq<Rc<U>> for &'a T {
    fn deep_eq(&self, other: &Rc<U>) -> bool {
        (**self).deep_eq(&**other)
    }
}

impl<'a, T: DeepEq<U> + ?Sized, U: ?Sized> DeepEq<Arc<U>> for &'a T {
    fn deep_eq(&self, other: &Arc<U>) -> bool {
        (**self).deep_eq(&**other)
    }
}

impl<'a, 'b, T: DeepEq<U> + ?Sized, U: ?Sized> DeepEq<&'b U> for &'a T {
    fn deep_eq(&self, other: &&'b U) -> bool {
        (**self).deep_eq(&**other)
    }
}

impl<T: DeepEq<U>, U> DeepEq<Option<U>> for Option<T> {
    fn deep_eq(&self, other: &Option<U>) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.deep_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: DeepEq<U>, U> DeepEq<[U]> for [T] {
    fn deep_eq(&self, other: &[U]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.deep_eq(b))
    }
}

impl<T: DeepEq<U>, U> DeepEq<Vec<U>> for Vec<T> {
    fn deep_eq(&self, other: &Vec<U>) -> bool {
        <[T] as DeepEq<[U]>>::deep_eq(self.as_slice(), other.as_slice())
    }
}

impl<T: DeepEq<U>, U, const N: usize> DeepEq<[U; N]> for [T; N] {
    fn deep_eq(&self, other: &[U; N]) -> bool {
        <[T] as DeepEq<[U]>>::deep_eq(&self[..], &other[..])
    }
}

impl<K: Ord, V: DeepEq<W>, W> DeepEq<BTreeMap<K, W>> for BTreeMap<K, V> {
    fn deep_eq(&self, other: &BTreeMap<K, W>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, v)| other.get(key).map_or(false, |w| v.deep_eq(w)))
    }
}

impl<K, V, W, S1, S2> DeepEq<HashMap<K, W, S2>> for HashMap<K, V, S1>
where
    K: Eq + Hash,
    V: DeepEq<W>,
    S1: BuildHasher,
    S2: BuildHasher,
{
    fn deep_eq(&self, other: &HashMap<K, W, S2>) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, v)| other.get(key).map_or(false, |w| v.deep_eq(w)))
    }
}

macro_rules! deep_eq_tuple {
    ($(($($t:ident $u:ident $idx:tt),+)),* $(,)?) => {
        $(
            impl<$($t: DeepEq<$u>, $u),+> DeepEq<($($u,)+)> for ($($t,)+) {
                fn deep_eq(&self, other: &($($u,)+)) -> bool {
                    true $(&& self.$idx.deep_eq(&other.$idx))+
                }
            }
        )*
    };
}

deep_eq_tuple!(
    (A1 B1 0),
    (A1 B1 0, A2 B2 1),
    (A1 B1 0, A2 B2 1, A3 B3 2),
    (A1 B1 0, A2 B2 1, A3 B3 2, A4 B4 3),
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::thread;

    #[derive(Debug, PartialEq)]
    struct Person {
        name: String,
        age: u32,
    }

    crate::value_semantics!(Person);

    #[derive(Debug, PartialEq)]
    enum Color {
        Red,
        Blue,
    }

    crate::value_semantics!(Color);

    #[test]
    fn test_typed_nil() {
        let missing: Option<Box<Person>> = None;
        assert!(missing.is_nil());
        assert!(std::ptr::null::<Person>().is_nil());
        assert!(().is_nil());
    }

    #[test]
    fn test_not_nil() {
        let person = Box::new(Person {
            name: "john".into(),
            age: 23,
        });
        assert!(!person.is_nil());
        assert!(!Some(1).is_nil());
        assert!(!true.is_nil());
        assert!(!"foo".is_nil());
        assert!(!(&*person as *const Person).is_nil());
    }

    #[test]
    fn test_dangling_weak_is_nil() {
        let strong = Rc::new(5);
        let weak = Rc::downgrade(&strong);
        assert!(!weak.is_nil());
        drop(strong);
        assert!(weak.is_nil());
    }

    #[test]
    fn test_rescue_captures_payload() {
        let payload = rescue(|| panic!("foobar!")).unwrap();
        assert_eq!(payload_message(&*payload), Some("foobar!"));
        assert!(rescue(|| {}).is_none());
    }

    #[test]
    fn test_payload_matches_across_string_types() {
        let payload = rescue(|| panic!("{}", "formatted")).unwrap();
        assert!(payload_matches(&*payload, &"formatted"));
        assert!(payload_matches(&*payload, &"formatted".to_string()));
        assert!(!payload_matches(&*payload, &"other"));
    }

    #[test]
    fn test_payload_matches_custom_value() {
        let payload = rescue(|| std::panic::panic_any(42_u8)).unwrap();
        assert!(payload_matches(&*payload, &42_u8));
        assert!(!payload_matches(&*payload, &7_u8));
        assert!(!payload_matches(&*payload, &"42"));
        assert_eq!(describe_payload(Some(&*payload)), "<non-string panic payload>");
    }

    #[test]
    fn test_describe_payload() {
        assert_eq!(describe_payload(None), "nil");
        let payload = rescue(|| panic!("boom")).unwrap();
        assert_eq!(describe_payload(Some(&*payload)), "\"boom\"");
    }

    #[test]
    fn test_rescue_inside_drop_while_unwinding() {
        struct RescueOnDrop {
            seen: Rc<Cell<Option<(bool, bool)>>>,
        }

        impl Drop for RescueOnDrop {
            fn drop(&mut self) {
                let quiet = rescue(|| {}).is_none();
                self.seen.set(Some((thread::panicking(), quiet)));
            }
        }

        let seen = Rc::new(Cell::new(None));
        let guard_seen = seen.clone();
        let payload = rescue(move || {
            let _guard = RescueOnDrop { seen: guard_seen };
            panic!("outer");
        })
        .unwrap();

        assert_eq!(payload_message(&*payload), Some("outer"));
        assert_eq!(seen.get(), Some((true, true)));
    }

    #[test]
    fn test_identity_of_pointers() {
        let a = Rc::new(Person {
            name: "john".into(),
            age: 23,
        });
        let same = a.clone();
        let twin = Rc::new(Person {
            name: "john".into(),
            age: 23,
        });
        assert!(a.identical(&same));
        assert!(!a.identical(&twin));

        let boxed = Box::new(5);
        assert!(boxed.identical(&boxed));
        assert!(!boxed.identical(&Box::new(5)));

        assert!("foo".identical(&"foo"));
        assert!(Some(3).identical(&Some(3)));
        assert!(!Some(3).identical(&None));
    }

    #[test]
    fn test_deep_eq_through_pointers() {
        let a = Box::new(Person {
            name: "john".into(),
            age: 23,
        });
        let b = Rc::new(Person {
            name: "john".into(),
            age: 23,
        });
        assert!(a.deep_eq(&b));
        assert!(Arc::new(vec![1, 2]).deep_eq(&&vec![1, 2]));

        let c = Person {
            name: "jane".into(),
            age: 23,
        };
        assert!(!a.deep_eq(&&c));
    }

    #[test]
    fn test_deep_eq_containers() {
        assert!(vec![Some(1), None].deep_eq(&vec![Some(1), None]));
        assert!(!vec![1, 2].deep_eq(&vec![1, 2, 3]));
        assert!(!Some(1).deep_eq(&None));
        assert!((1, "a", 'c').deep_eq(&(1, "a", 'c')));

        let mut left = HashMap::new();
        left.insert((1, 2), Box::new("tuple keys"));
        let mut right = HashMap::new();
        right.insert((1, 2), Rc::new("tuple keys"));
        assert!(left.deep_eq(&right));

        right.insert((3, 4), Rc::new("extra"));
        assert!(!left.deep_eq(&right));

        let ordered: BTreeMap<_, _> = [("a", 1), ("b", 2)].into_iter().collect();
        assert!(ordered.deep_eq(&ordered.clone()));
    }

    #[test]
    fn test_deep_eq_leaves() {
        assert!(!f64::INFINITY.deep_eq(&f64::NAN));
        assert!(!f64::NAN.deep_eq(&f64::NAN));
        assert!(1.5_f64.deep_eq(&1.5));
        assert!(!Color::Red.deep_eq(&Color::Blue));
        assert!(Color::Blue.deep_eq(&Color::Blue));
    }
}
