use std::collections::HashMap;

use crate::error::Result;
use crate::workbook::{HAlign, StyleId, StyleSpec, VAlign, Workbook};

const FONT_NAME: &str = "Times New Roman";
const FONT_SIZE: f64 = 11.0;

/// The reusable styles handlers ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleRole {
    Centered,
    Left,
}

impl StyleRole {
    pub fn name(&self) -> &'static str {
        match self {
            StyleRole::Centered => "centered",
            StyleRole::Left => "left",
        }
    }

    pub fn spec(&self) -> StyleSpec {
        let horizontal = match self {
            StyleRole::Centered => HAlign::Center,
            StyleRole::Left => HAlign::Left,
        };
        StyleSpec {
            font_name: FONT_NAME.to_string(),
            font_size: FONT_SIZE,
            bold: false,
            horizontal,
            vertical: VAlign::Center,
            bordered: true,
        }
    }
}

/// Memoizes style handles by logical name so each style is allocated once
/// per cache. Not meant to be shared between passes.
#[derive(Debug, Default)]
pub struct StyleCache {
    cache: HashMap<String, StyleId>,
}

impl StyleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(
        &mut self,
        book: &mut dyn Workbook,
        name: &str,
        spec: &StyleSpec,
    ) -> Result<StyleId> {
        if let Some(id) = self.cache.get(name) {
            return Ok(*id);
        }

        let id = book.new_style(spec)?;
        log::trace!("allocated style {:?} for \"{}\"", id, name);
        self.cache.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn role(&mut self, book: &mut dyn Workbook, role: StyleRole) -> Result<StyleId> {
        self.get_or_create(book, role.name(), &role.spec())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::UmyaWorkbook;

    #[test]
    fn test_same_name_returns_same_handle() {
        let mut book = UmyaWorkbook::new();
        let mut cache = StyleCache::new();

        let first = cache.role(&mut book, StyleRole::Centered).unwrap();
        let second = cache.role(&mut book, StyleRole::Centered).unwrap();

        assert_eq!(first, second);
        assert_eq!(book.style_count(), 1);
    }

    #[test]
    fn test_different_names_get_different_handles() {
        let mut book = UmyaWorkbook::new();
        let mut cache = StyleCache::new();

        let centered = cache.role(&mut book, StyleRole::Centered).unwrap();
        let left = cache.role(&mut book, StyleRole::Left).unwrap();

        assert_ne!(centered, left);
        assert_eq!(cache.len(), 2);
        assert_eq!(book.style_count(), 2);
    }

    #[test]
    fn test_fresh_cache_allocates_again() {
        let mut book = UmyaWorkbook::new();
        let first = StyleCache::new().role(&mut book, StyleRole::Left).unwrap();
        let second = StyleCache::new().role(&mut book, StyleRole::Left).unwrap();

        assert_ne!(first, second);
    }
}
