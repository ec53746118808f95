/// Limits and cache sizing for an [`Engine`](crate::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest nesting of sub-expressions (groups, call arguments, unary minus)
    /// the parser accepts before failing. Also caps the height of a parsed tree.
    pub max_parse_depth: usize,
    /// Deepest tree walk the evaluator and printer perform, counting levels
    /// reached through substituted bindings.
    pub max_eval_depth: usize,
    /// Longest chain of string/node bindings followed while resolving one variable.
    pub max_substitution_depth: usize,
    /// Number of re-parsed binding strings kept around. `0` disables the cache.
    pub parse_cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_parse_depth: 256,
            max_eval_depth: 512,
            max_substitution_depth: 32,
            parse_cache_size: 100,
        }
    }
}

impl EngineConfig {
    pub fn with_max_parse_depth(mut self, depth: usize) -> Self {
        self.max_parse_depth = depth;
        self
    }

    pub fn with_max_eval_depth(mut self, depth: usize) -> Self {
        self.max_eval_depth = depth;
        self
    }

    pub fn with_max_substitution_depth(mut self, depth: usize) -> Self {
        self.max_substitution_depth = depth;
        self
    }

    pub fn with_parse_cache_size(mut self, size: usize) -> Self {
        self.parse_cache_size = size;
        self
    }
}
