use thiserror::Error;

use crate::model::ids::CategoryId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CategoryError {
    #[error("unknown category id: {0}")]
    NotFound(CategoryId),
}

/// A selectable trivia category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    name: &'static str,
}

impl Category {
    const fn new(id: u32, name: &'static str) -> Self {
        Self {
            id: CategoryId::new(id),
            name,
        }
    }

    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Category preselected for a fresh configuration ("Science: Computers").
pub const DEFAULT_CATEGORY_ID: CategoryId = CategoryId::new(18);

static CATALOG: [Category; 24] = [
    Category::new(9, "General Knowledge"),
    Category::new(10, "Entertainment: Books"),
    Category::new(11, "Entertainment: Film"),
    Category::new(12, "Entertainment: Music"),
    Category::new(13, "Entertainment: Musicals & Theatres"),
    Category::new(14, "Entertainment: Television"),
    Category::new(15, "Entertainment: Video Games"),
    Category::new(16, "Entertainment: Board Games"),
    Category::new(17, "Science & Nature"),
    Category::new(18, "Science: Computers"),
    Category::new(19, "Science: Mathematics"),
    Category::new(20, "Mythology"),
    Category::new(21, "Sports"),
    Category::new(22, "Geography"),
    Category::new(23, "History"),
    Category::new(24, "Politics"),
    Category::new(25, "Art"),
    Category::new(26, "Celebrities"),
    Category::new(27, "Animals"),
    Category::new(28, "Vehicles"),
    Category::new(29, "Entertainment: Comics"),
    Category::new(30, "Science: Gadgets"),
    Category::new(31, "Entertainment: Japanese Anime & Manga"),
    Category::new(32, "Entertainment: Cartoon & Animations"),
];

/// All categories in presentation order.
#[must_use]
pub fn list_all() -> &'static [Category] {
    &CATALOG
}

/// Resolve a category by id.
///
/// # Errors
///
/// Returns `CategoryError::NotFound` when the id is not in the catalog.
pub fn lookup(id: CategoryId) -> Result<&'static Category, CategoryError> {
    CATALOG
        .iter()
        .find(|category| category.id == id)
        .ok_or(CategoryError::NotFound(id))
}

#[must_use]
pub fn default_category() -> &'static Category {
    CATALOG
        .iter()
        .find(|category| category.id == DEFAULT_CATEGORY_ID)
        .unwrap_or(&CATALOG[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_24_entries_in_id_order() {
        let all = list_all();
        assert_eq!(all.len(), 24);
        assert_eq!(all.first().unwrap().id(), CategoryId::new(9));
        assert_eq!(all.last().unwrap().id(), CategoryId::new(32));
        assert!(all.windows(2).all(|w| w[0].id() < w[1].id()));
    }

    #[test]
    fn lookup_resolves_known_id() {
        let category = lookup(CategoryId::new(22)).unwrap();
        assert_eq!(category.name(), "Geography");
    }

    #[test]
    fn lookup_rejects_unknown_id() {
        let err = lookup(CategoryId::new(8)).unwrap_err();
        assert_eq!(err, CategoryError::NotFound(CategoryId::new(8)));
        assert!(lookup(CategoryId::new(33)).is_err());
    }

    #[test]
    fn default_category_is_computers() {
        assert_eq!(default_category().name(), "Science: Computers");
    }
}
