//! List view state for record tables: search and pagination.

/// Rows shown per page unless changed.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A row that can be matched by the table's search box.
pub trait Searchable {
    /// Text the search term is matched against.
    fn search_text(&self) -> &str;
}

/// Search and pagination state over a set of loaded rows.
///
/// Changing the search term always returns to the first page.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    rows: Vec<T>,
    search: String,
    page_size: usize,
    page: usize,
}

impl<T: Searchable> ListView<T> {
    /// Creates a view over `rows` with the default page size.
    #[must_use]
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            search: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 0,
        }
    }

    /// Replaces the loaded rows, keeping the search term.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        self.page = self.page.min(self.page_count().saturating_sub(1));
    }

    /// All loaded rows, unfiltered.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Sets the search term and goes back to the first page.
    pub fn search(&mut self, term: impl Into<String>) {
        self.search = term.into().to_lowercase();
        self.page = 0;
    }

    /// Current search term, lowercased.
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// Sets how many rows a page holds; zero is treated as one.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Moves to `page` (zero-based), clamped to the last page.
    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.min(self.page_count().saturating_sub(1));
    }

    /// Current page, zero-based.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Rows matching the search term.
    pub fn filtered(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().filter(|row| {
            self.search.is_empty() || row.search_text().to_lowercase().contains(&self.search)
        })
    }

    /// Number of rows matching the search term.
    #[must_use]
    pub fn filtered_count(&self) -> usize {
        self.filtered().count()
    }

    /// Number of pages; an empty result still has one page.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.filtered_count().div_ceil(self.page_size).max(1)
    }

    /// Rows on the current page.
    #[must_use]
    pub fn visible(&self) -> Vec<&T> {
        self.filtered()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }
}
