//! Fixed category catalog.
//!
//! The catalog is built once per process and handed out as a `&'static`
//! reference. Nothing mutates it after construction.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// Slug every unknown or missing category collapses to.
pub const FALLBACK_SLUG: &str = "other";

/// A single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Stable machine identifier, e.g. `tech`
    pub slug: &'static str,
    /// Chinese display name
    pub name_local: &'static str,
    /// English display name
    pub name_en: &'static str,
}

const ENTRIES: [Category; 9] = [
    Category { slug: "tech", name_local: "技术", name_en: "Technology" },
    Category { slug: "business", name_local: "商业", name_en: "Business" },
    Category { slug: "science", name_local: "科学", name_en: "Science" },
    Category { slug: "culture", name_local: "文化", name_en: "Culture" },
    Category { slug: "lifestyle", name_local: "生活", name_en: "Lifestyle" },
    Category { slug: "news", name_local: "新闻", name_en: "News" },
    Category { slug: "education", name_local: "教育", name_en: "Education" },
    Category { slug: "design", name_local: "设计", name_en: "Design" },
    Category { slug: FALLBACK_SLUG, name_local: "其他", name_en: "Other" },
];

lazy_static! {
    static ref CATALOG: Catalog = Catalog::new(&ENTRIES);
}

/// Read-only registry of the known categories.
#[derive(Debug)]
pub struct Catalog {
    entries: &'static [Category],
    by_slug: HashMap<&'static str, usize>,
    fallback: usize,
}

impl Catalog {
    fn new(entries: &'static [Category]) -> Self {
        let by_slug: HashMap<_, _> = entries
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.slug, idx))
            .collect();
        let fallback = by_slug.get(FALLBACK_SLUG).copied().unwrap_or(entries.len() - 1);

        Self {
            entries,
            by_slug,
            fallback,
        }
    }

    /// The process-wide built-in catalog
    pub fn builtin() -> &'static Catalog {
        &CATALOG
    }

    /// All entries, in prompt order
    pub fn entries(&self) -> &[Category] {
        self.entries
    }

    /// Look up a category by slug
    pub fn get(&self, slug: &str) -> Option<&Category> {
        self.by_slug.get(slug).map(|&idx| &self.entries[idx])
    }

    pub fn is_known(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    /// The catch-all `other` entry
    pub fn fallback(&self) -> &Category {
        &self.entries[self.fallback]
    }

    /// Resolve a slug to its display name and whether it is a catalog slug.
    ///
    /// Unknown, empty and absent slugs resolve to the fallback entry's name
    /// with `is_known = false`.
    pub fn resolve(&self, slug: Option<&str>) -> (&'static str, bool) {
        match slug.and_then(|s| self.by_slug.get(s)) {
            Some(&idx) => (self.entries[idx].name_en, true),
            None => (self.entries[self.fallback].name_en, false),
        }
    }
}
