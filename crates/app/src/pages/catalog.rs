//! Home catalog with live search

use streamia_core::{Catalog, Movie};

#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    catalog: Catalog,
    query: String,
}

impl CatalogPage {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            query: String::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Titles matching the current search
    pub fn visible(&self) -> Vec<&Movie> {
        self.catalog.search(&self.query)
    }

    pub fn popular(&self) -> &[Movie] {
        self.catalog.popular()
    }

    pub fn trending(&self) -> &[Movie] {
        self.catalog.trending()
    }

    /// Shown instead of the grid when a search matches nothing
    pub fn empty_message(&self) -> Option<String> {
        let query = self.query.trim();
        if query.is_empty() || !self.visible().is_empty() {
            return None;
        }
        Some(format!("No se encontraron películas para \"{}\"", query))
    }
}
