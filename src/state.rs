use std::sync::Arc;

use crate::{catalog::Catalog, repository::StorefrontRepository};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn StorefrontRepository>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(repo: Arc<dyn StorefrontRepository>, catalog: Arc<Catalog>) -> Self {
        Self { repo, catalog }
    }
}
