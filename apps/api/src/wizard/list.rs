use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::errors::AppError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("cannot hold more than {max} items")]
    Full { max: usize },

    #[error("at least one item must remain")]
    LastItem,

    #[error("no item at index {index}")]
    OutOfRange { index: usize },

    #[error("must contain between 1 and {max} items, got {len}")]
    BadLength { len: usize, max: usize },
}

impl From<ListError> for AppError {
    fn from(e: ListError) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// An editable list that always keeps between 1 and `max_items` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedList {
    items: Vec<String>,
    max_items: usize,
}

impl BoundedList {
    /// A list with a single empty slot ready for editing.
    pub fn new(max_items: usize) -> Self {
        Self {
            items: vec![String::new()],
            max_items: max_items.max(1),
        }
    }

    /// Replaces the whole list, e.g. from a form submission.
    pub fn from_items(items: Vec<String>, max_items: usize) -> Result<Self, ListError> {
        let max_items = max_items.max(1);
        if items.is_empty() || items.len() > max_items {
            return Err(ListError::BadLength {
                len: items.len(),
                max: max_items,
            });
        }
        Ok(Self { items, max_items })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn add(&mut self, value: String) -> Result<(), ListError> {
        if self.items.len() >= self.max_items {
            return Err(ListError::Full {
                max: self.max_items,
            });
        }
        self.items.push(value);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<String, ListError> {
        if index >= self.items.len() {
            return Err(ListError::OutOfRange { index });
        }
        if self.items.len() == 1 {
            return Err(ListError::LastItem);
        }
        Ok(self.items.remove(index))
    }

    pub fn update(&mut self, index: usize, value: String) -> Result<(), ListError> {
        let slot = self
            .items
            .get_mut(index)
            .ok_or(ListError::OutOfRange { index })?;
        *slot = value;
        Ok(())
    }

    /// Trimmed entries with blanks dropped, in order.
    pub fn non_blank(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

impl Serialize for BoundedList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_list_has_one_empty_slot() {
        let list = BoundedList::new(5);
        assert_eq!(list.items(), &[String::new()]);
    }

    #[test]
    fn test_add_stops_at_max() {
        let mut list = BoundedList::new(5);
        for i in 0..4 {
            list.add(format!("q{i}")).unwrap();
        }
        assert_eq!(list.len(), 5);
        assert_eq!(list.add("q5".into()), Err(ListError::Full { max: 5 }));
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_cannot_remove_last_item() {
        let mut list = BoundedList::new(5);
        assert_eq!(list.remove(0), Err(ListError::LastItem));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_and_update_by_index() {
        let mut list = BoundedList::from_items(vec!["a".into(), "b".into(), "c".into()], 5).unwrap();
        assert_eq!(list.remove(1).unwrap(), "b");
        list.update(1, "z".into()).unwrap();
        assert_eq!(list.items(), &["a".to_string(), "z".to_string()]);
        assert_eq!(list.update(7, "x".into()), Err(ListError::OutOfRange { index: 7 }));
        assert_eq!(list.remove(9), Err(ListError::OutOfRange { index: 9 }));
    }

    #[test]
    fn test_from_items_enforces_bounds() {
        assert!(BoundedList::from_items(vec![], 5).is_err());
        assert!(BoundedList::from_items(vec!["x".into(); 6], 5).is_err());
        assert!(BoundedList::from_items(vec!["x".into(); 5], 5).is_ok());
    }

    #[test]
    fn test_non_blank_drops_empty_entries() {
        let list =
            BoundedList::from_items(vec!["  Why us? ".into(), "".into(), "   ".into()], 5).unwrap();
        assert_eq!(list.non_blank(), vec!["Why us?".to_string()]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let list = BoundedList::from_items(vec!["a".into(), "b".into()], 5).unwrap();
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add,
        Remove(usize),
        Update(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Add),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8).prop_map(Op::Update),
        ]
    }

    proptest! {
        #[test]
        fn prop_length_stays_within_bounds(ops in prop::collection::vec(op(), 0..64)) {
            let mut list = BoundedList::new(5);
            for op in ops {
                let _ = match op {
                    Op::Add => list.add("q".into()),
                    Op::Remove(i) => list.remove(i).map(|_| ()),
                    Op::Update(i) => list.update(i, "u".into()),
                };
                prop_assert!(list.len() >= 1);
                prop_assert!(list.len() <= 5);
            }
        }
    }
}
