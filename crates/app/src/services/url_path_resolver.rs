//! Url path resolver — assigns each automation a unique slug.

use autohub_domain::error::AutoHubError;
use autohub_domain::id::AutomationId;
use autohub_domain::url_path::{slugify, with_suffix};

use crate::ports::AutomationRepository;

/// Finds a free url path for a name.
///
/// The lookup and the later write are not atomic, so two concurrent saves
/// may pick the same candidate; the repository's uniqueness constraint is
/// what finally rejects one of them.
pub struct UrlPathResolver<'r, R> {
    repo: &'r R,
}

impl<'r, R: AutomationRepository> UrlPathResolver<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    /// Resolve the url path for `name` on behalf of automation `owner`.
    ///
    /// Tries the slug of `name`, then `slug-1`, `slug-2`, … and returns the
    /// first candidate that is free or already held by `owner`. A name with
    /// no usable characters resolves to an empty path, which validation
    /// rejects later.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn resolve(&self, name: &str, owner: AutomationId) -> Result<String, AutoHubError> {
        let base = slugify(name);
        if base.is_empty() {
            return Ok(base);
        }

        let mut candidate = base.clone();
        let mut counter = 0;
        loop {
            match self.repo.get_by_url_path(&candidate).await? {
                Some(existing) if existing.id != owner => {
                    counter += 1;
                    candidate = with_suffix(&base, counter);
                }
                _ => return Ok(candidate),
            }
        }
    }
}
