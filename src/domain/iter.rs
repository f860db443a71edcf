// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazy iteration over the children of a [`Value`].

use crate::domain::value::Value;
use std::collections::btree_map;
use std::iter::FusedIterator;
use std::slice;

/// Iterator over array elements or object members.
///
/// Produced by [`Value::iter`]. Array elements come with a `None` key, object
/// members with their key in sorted order; scalars and null yield nothing.
/// Each call to [`Value::iter`] starts a fresh pass.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: Inner<'a>,
}

#[derive(Clone, Debug)]
enum Inner<'a> {
    Empty,
    Array(slice::Iter<'a, Value>),
    Object(btree_map::Iter<'a, String, Value>),
}

impl<'a> Iter<'a> {
    pub(crate) fn new(value: &'a Value) -> Self {
        let inner = match value {
            Value::Array(items) => Inner::Array(items.iter()),
            Value::Object(map) => Inner::Object(map.iter()),
            _ => Inner::Empty,
        };
        Self { inner }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Option<&'a str>, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Empty => None,
            Inner::Array(items) => items.next().map(|value| (None, value)),
            Inner::Object(members) => members
                .next()
                .map(|(key, value)| (Some(key.as_str()), value)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Inner::Empty => (0, Some(0)),
            Inner::Array(items) => items.size_hint(),
            Inner::Object(members) => members.size_hint(),
        }
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_size() {
        let value: Value = vec![Value::from(1), Value::from(2), Value::from(3)].into();
        let mut iter = value.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
    }

    #[test]
    fn test_fused_after_end() {
        let value: Value = vec![Value::from(1)].into();
        let mut iter = value.iter();
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_scalar_is_empty() {
        let value = Value::from(true);
        assert_eq!(value.iter().len(), 0);
        assert!(value.iter().next().is_none());
    }
}
