//! Small typed helpers over numbers, strings and collections.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

pub const A: i64 = 1;
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.14;
pub const I_UNDERSTAND_ANNOTATIONS: bool = true;
pub const SCHOOL: &str = "Holberton";

/// Default repetition factor for [`zoom_array`].
pub const DEFAULT_ZOOM_FACTOR: usize = 2;

pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

pub fn concat(first: &str, second: &str) -> String {
    let mut out = String::with_capacity(first.len() + second.len());
    out.push_str(first);
    out.push_str(second);
    out
}

/// Drops the fractional part, rounding toward zero.
pub fn floor(n: f64) -> i64 {
    n.trunc() as i64
}

/// Renders a float so that it always carries a fractional part (`1.0`, not `1`).
pub fn to_str(n: f64) -> String {
    format!("{:?}", n)
}

pub fn sum_list(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// A number that is either an integer or a float.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

pub fn sum_mixed_list(values: &[Number]) -> f64 {
    values.iter().map(|n| n.as_f64()).sum()
}

/// Pair `key` with the square of `value`.
pub fn to_kv(key: &str, value: impl Into<f64>) -> (String, f64) {
    let v = value.into();
    (key.to_string(), v * v)
}

pub fn make_multiplier(multiplier: f64) -> impl Fn(f64) -> f64 {
    move |x| x * multiplier
}

/// Anything with a length.
pub trait Sequence {
    fn length(&self) -> usize;
}

impl Sequence for str {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl Sequence for String {
    fn length(&self) -> usize {
        self.as_str().length()
    }
}

impl<T> Sequence for [T] {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> Sequence for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T, const N: usize> Sequence for [T; N] {
    fn length(&self) -> usize {
        N
    }
}

impl<S: Sequence + ?Sized> Sequence for &S {
    fn length(&self) -> usize {
        (**self).length()
    }
}

/// Pair every item with its length.
pub fn element_length<I>(items: I) -> Vec<(I::Item, usize)>
where
    I: IntoIterator,
    I::Item: Sequence,
{
    items
        .into_iter()
        .map(|item| {
            let len = item.length();
            (item, len)
        })
        .collect()
}

pub fn safe_first_element<T>(items: &[T]) -> Option<&T> {
    items.first()
}

/// Look up `key`, falling back to `default` when it is absent.
pub fn safely_get_value<'a, K, V, Q>(
    map: &'a HashMap<K, V>,
    key: &Q,
    default: Option<&'a V>,
) -> Option<&'a V>
where
    K: Borrow<Q> + Eq + Hash,
    Q: Eq + Hash + ?Sized,
{
    map.get(key).or(default)
}

/// Repeat every item `factor` times, keeping the original order.
pub fn zoom_array<T: Clone>(items: &[T], factor: usize) -> Vec<T> {
    items
        .iter()
        .flat_map(|item| std::iter::repeat_n(item.clone(), factor))
        .collect()
}
