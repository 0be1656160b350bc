//! In-memory movie store.
//!
//! An ordered `Vec<Movie>`; every operation is a linear scan. Insertion order
//! is preserved, removal shifts later records without touching their ids.

use thiserror::Error;

use crate::movies::model::{Movie, MovieId, MoviePatch};

/// Error type for store mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("movie {0} already exists")]
    DuplicateId(MovieId),
}

/// The record store. Owned by the HTTP layer and shared through router state.
#[derive(Debug, Clone, Default)]
pub struct MovieStore {
    movies: Vec<Movie>,
}

impl MovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing records, rejecting duplicate ids.
    pub fn from_movies(movies: impl IntoIterator<Item = Movie>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for movie in movies {
            store.append(movie)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// All records in insertion order.
    pub fn list_all(&self) -> &[Movie] {
        &self.movies
    }

    /// Records with at least one genre matching `genre`, ignoring case.
    pub fn list_by_genre(&self, genre: &str) -> Vec<&Movie> {
        self.movies
            .iter()
            .filter(|movie| movie.has_genre(genre))
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id.as_str() == id)
    }

    /// Add a record at the end.
    pub fn append(&mut self, movie: Movie) -> Result<&Movie, StoreError> {
        if self.position(movie.id.as_str()).is_some() {
            return Err(StoreError::DuplicateId(movie.id));
        }
        self.movies.push(movie);
        Ok(&self.movies[self.movies.len() - 1])
    }

    /// Remove the record with `id`. Returns whether one was removed.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(index) => {
                self.movies.remove(index);
                true
            }
            None => false,
        }
    }

    /// Overwrite the record at `id`'s position with `merged`.
    ///
    /// The stored id always stays `id`, whatever `merged.id` says.
    pub fn replace_by_id(&mut self, id: &str, merged: Movie) -> Option<&Movie> {
        let index = self.position(id)?;
        let slot = &mut self.movies[index];
        let id = slot.id.clone();
        *slot = Movie { id, ..merged };
        Some(&*slot)
    }

    /// Look up, overlay and replace in one step.
    pub fn update_by_id(&mut self, id: &str, patch: MoviePatch) -> Option<&Movie> {
        let merged = self.find_by_id(id)?.clone().overlay(patch);
        self.replace_by_id(id, merged)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.movies.iter().position(|movie| movie.id.as_str() == id)
    }
}
