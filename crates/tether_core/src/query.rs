//! Selector registry for resolving `#id` and tag queries
//!
//! Elements register under an optional id and a tag. Two selector forms are
//! understood:
//!
//! - `#id` matches the element registered with that id
//! - `tag` matches every element registered with that tag, in registration order
//!
//! Anything else (classes, attributes, combinators) is rejected with
//! [`TetherError::UnsupportedSelector`]. A well-formed selector that matches
//! nothing is not an error.

use crate::error::{Result, TetherError};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A parsed selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    Id(&'a str),
    Tag(&'a str),
}

impl<'a> Selector<'a> {
    pub fn parse(text: &'a str) -> Result<Self> {
        let text = text.trim();
        if let Some(id) = text.strip_prefix('#') {
            if is_name(id) {
                return Ok(Selector::Id(id));
            }
        } else if is_name(text) && text.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Ok(Selector::Tag(text));
        }
        Err(TetherError::UnsupportedSelector(text.to_string()))
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

struct Entry<T: ?Sized> {
    id: Option<String>,
    tag: String,
    element: Rc<T>,
}

/// Registry of queryable elements
///
/// Ids are unique: registering an id twice replaces the old mapping
/// (last-wins) and logs a warning.
pub struct Registry<T: ?Sized> {
    entries: RefCell<Vec<Entry<T>>>,
    ids: RefCell<FxHashMap<String, usize>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .field("ids", &self.ids.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            ids: RefCell::new(FxHashMap::default()),
        }
    }

    /// Register an element under a tag and optional id
    pub fn register(&self, id: Option<&str>, tag: &str, element: Rc<T>) {
        if let Some(id) = id {
            if let Some(previous) = self.ids.borrow().get(id).copied() {
                tracing::warn!("Duplicate element ID registered: {}", id);
                self.entries.borrow_mut()[previous].id = None;
            }
        }

        let mut entries = self.entries.borrow_mut();
        entries.push(Entry {
            id: id.map(str::to_string),
            tag: tag.to_string(),
            element,
        });
        if let Some(id) = id {
            self.ids.borrow_mut().insert(id.to_string(), entries.len() - 1);
        }
        tracing::debug!(id, tag, "registered element");
    }

    /// Remove an element by identity
    pub fn unregister(&self, element: &Rc<T>) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(index) = entries
            .iter()
            .position(|entry| Rc::ptr_eq(&entry.element, element))
        else {
            return false;
        };
        entries.remove(index);

        let mut ids = self.ids.borrow_mut();
        ids.clear();
        for (i, entry) in entries.iter().enumerate() {
            if let Some(id) = &entry.id {
                ids.insert(id.clone(), i);
            }
        }
        true
    }

    /// Look up an element by id
    pub fn get(&self, id: &str) -> Option<Rc<T>> {
        let index = self.ids.borrow().get(id).copied()?;
        self.entries
            .borrow()
            .get(index)
            .map(|entry| entry.element.clone())
    }

    /// All elements matching `selector`
    pub fn query_all(&self, selector: &str) -> Result<Vec<Rc<T>>> {
        match Selector::parse(selector)? {
            Selector::Id(id) => Ok(self.get(id).into_iter().collect()),
            Selector::Tag(tag) => Ok(self
                .entries
                .borrow()
                .iter()
                .filter(|entry| entry.tag == tag)
                .map(|entry| entry.element.clone())
                .collect()),
        }
    }

    /// First element matching `selector`
    pub fn query(&self, selector: &str) -> Result<Option<Rc<T>>> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry<str> {
        let r = Registry::<str>::new();
        r.register(Some("left"), "box", Rc::from("left box"));
        r.register(Some("right"), "box", Rc::from("right box"));
        r.register(None, "sphere", Rc::from("ball"));
        r
    }

    #[test]
    fn id_selector_finds_single_element() {
        let r = registry();
        assert_eq!(r.query("#right").unwrap().as_deref(), Some("right box"));
        assert!(r.query("#missing").unwrap().is_none());
    }

    #[test]
    fn tag_selector_keeps_registration_order() {
        let r = registry();
        let boxes: Vec<String> = r
            .query_all("box")
            .unwrap()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(boxes, vec!["left box", "right box"]);
        assert!(r.query_all("ground").unwrap().is_empty());
    }

    #[test]
    fn unsupported_selectors_are_errors() {
        let r = registry();
        for bad in ["", "#", ".box", "box > sphere", "[name=ball]", "9lives"] {
            assert!(
                matches!(r.query_all(bad), Err(TetherError::UnsupportedSelector(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn duplicate_id_is_last_wins() {
        let r = registry();
        r.register(Some("left"), "box", Rc::from("newer"));
        assert_eq!(r.get("left").as_deref(), Some("newer"));
        assert_eq!(r.query_all("box").unwrap().len(), 3);
    }

    #[test]
    fn unregister_reindexes_ids() {
        let r = registry();
        let left = r.get("left").unwrap();
        assert!(r.unregister(&left));
        assert!(!r.unregister(&left));
        assert!(r.get("left").is_none());
        assert_eq!(r.get("right").as_deref(), Some("right box"));
    }
}
