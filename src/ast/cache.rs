use crate::ast::ASTNode;
use crate::error::Error;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Parsed forms of binding strings, so a string bound to a variable is only
/// parsed once across evaluations.
pub(crate) struct ParseCache {
    entries: Mutex<LruCache<String, Arc<ASTNode>>>,
}

impl ParseCache {
    /// `None` when `capacity` is zero.
    pub fn new(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(|capacity| Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub fn get_or_parse<F>(&self, source: &str, parse: F) -> Result<Arc<ASTNode>, Error>
    where
        F: FnOnce(&str) -> Result<ASTNode, Error>,
    {
        if let Some(hit) = self.lock().get(source) {
            return Ok(Arc::clone(hit));
        }
        let node = Arc::new(parse(source)?);
        self.lock().put(source.to_string(), Arc::clone(&node));
        Ok(node)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<ASTNode>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
