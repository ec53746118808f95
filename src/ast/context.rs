use crate::ast::ASTNode;
use crate::error::EvalError;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// A value bound to a variable name.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Expression source, parsed and evaluated in place of the variable.
    Source(String),
    /// Already-built expression, evaluated in place of the variable.
    Node(Arc<ASTNode>),
}

impl Binding {
    /// The numeric value, if the binding is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Binding::Int(value) => Some(*value as f64),
            Binding::UInt(value) => Some(*value as f64),
            Binding::Float(value) => Some(*value),
            Binding::Source(_) | Binding::Node(_) => None,
        }
    }
}

macro_rules! impl_binding_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Binding {
                fn from(value: $source) -> Self {
                    Binding::$variant(value as $target)
                }
            }
        )*
    };
}

impl_binding_from!(Int as i64: i8, i16, i32, i64, isize);
impl_binding_from!(UInt as u64: u8, u16, u32, u64, usize);
impl_binding_from!(Float as f64: f32, f64);

impl From<&str> for Binding {
    fn from(value: &str) -> Self {
        Binding::Source(value.to_string())
    }
}

impl From<String> for Binding {
    fn from(value: String) -> Self {
        Binding::Source(value)
    }
}

impl From<ASTNode> for Binding {
    fn from(value: ASTNode) -> Self {
        Binding::Node(Arc::new(value))
    }
}

impl From<Arc<ASTNode>> for Binding {
    fn from(value: Arc<ASTNode>) -> Self {
        Binding::Node(value)
    }
}

/// Variable bindings plus the names differentiation-aware functions work against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    bindings: HashMap<String, Binding>,
    differentiation: BTreeSet<String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with<B: Into<Binding>>(mut self, name: &str, value: B) -> Self {
        self.insert(name, value);
        self
    }

    pub fn with_differentiation<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.differentiation
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn insert<B: Into<Binding>>(&mut self, name: &str, value: B) -> Option<Binding> {
        self.bindings.insert(name.to_string(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn differentiation_names(&self) -> impl Iterator<Item = &str> {
        self.differentiation.iter().map(String::as_str)
    }

    pub fn is_differentiation_variable(&self, name: &str) -> bool {
        self.differentiation.contains(name)
    }

    /// A copy of this set with `name` rebound to `value`.
    pub fn with_binding<B: Into<Binding>>(&self, name: &str, value: B) -> Self {
        self.clone().with(name, value)
    }
}

impl<S: Into<String>, B: Into<Binding>> FromIterator<(S, B)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (S, B)>>(iter: I) -> Self {
        Self {
            bindings: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
            differentiation: BTreeSet::new(),
        }
    }
}

/// One link in the chain of variables currently being substituted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Substitution<'a> {
    name: &'a str,
    depth: usize,
    parent: Option<&'a Substitution<'a>>,
}

impl<'a> Substitution<'a> {
    fn contains(&self, name: &str) -> bool {
        let mut link = Some(self);
        while let Some(current) = link {
            if current.name == name {
                return true;
            }
            link = current.parent;
        }
        false
    }
}

/// What a walk over the tree carries downward: the caller's parameters, the
/// substitutions in progress and how many levels deep the walk is.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Frame<'a> {
    pub params: Option<&'a Parameters>,
    pub substitutions: Option<&'a Substitution<'a>>,
    pub depth: usize,
}

impl<'a> Frame<'a> {
    pub fn new(params: Option<&'a Parameters>) -> Self {
        Self {
            params,
            substitutions: None,
            depth: 0,
        }
    }

    /// The same frame one level further down the tree.
    pub fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }

    /// Starts substituting `name`, failing on a cycle or when `limit` links are exceeded.
    pub fn enter<'b>(&'b self, name: &'b str, limit: usize) -> Result<Substitution<'b>, EvalError> {
        let depth = self.substitutions.map_or(0, |link| link.depth) + 1;
        if self.substitutions.is_some_and(|link| link.contains(name)) {
            return Err(EvalError::CyclicSubstitution(name.to_string()));
        }
        if depth > limit {
            return Err(EvalError::SubstitutionTooDeep {
                name: name.to_string(),
                limit,
            });
        }
        Ok(Substitution {
            name,
            depth,
            parent: self.substitutions,
        })
    }

    pub fn nested<'b>(&'b self, link: &'b Substitution<'b>) -> Frame<'b> {
        Frame {
            params: self.params,
            substitutions: Some(link),
            depth: self.depth,
        }
    }

    pub fn with_params<'b>(&'b self, params: &'b Parameters) -> Frame<'b> {
        Frame {
            params: Some(params),
            substitutions: self.substitutions,
            depth: self.depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_widths() {
        assert_eq!(Binding::from(-3i8), Binding::Int(-3));
        assert_eq!(Binding::from(7u16), Binding::UInt(7));
        assert_eq!(Binding::from(1.5f32), Binding::Float(1.5));
        assert_eq!(Binding::from(u64::MAX).as_number(), Some(u64::MAX as f64));
        assert_eq!(Binding::from("x + 1").as_number(), None);
    }

    #[test]
    fn test_parameters_builder() {
        let params = Parameters::new()
            .with("x", 5)
            .with("y", "x * 2")
            .with_differentiation(["x"]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("x"), Some(&Binding::Int(5)));
        assert_eq!(params.get("y"), Some(&Binding::Source("x * 2".to_string())));
        assert!(params.is_differentiation_variable("x"));
        assert!(!params.is_differentiation_variable("y"));
        assert_eq!(params.differentiation_names().collect::<Vec<_>>(), ["x"]);
    }

    #[test]
    fn test_with_binding_leaves_original_untouched() {
        let params: Parameters = [("x", 1.0)].into_iter().collect();
        let shifted = params.with_binding("x", 2.0);
        assert_eq!(params.get("x"), Some(&Binding::Float(1.0)));
        assert_eq!(shifted.get("x"), Some(&Binding::Float(2.0)));
    }

    #[test]
    fn test_frame_detects_cycles() {
        let frame = Frame::new(None);
        let a = frame.enter("a", 8).unwrap();
        let inner = frame.nested(&a);
        let b = inner.enter("b", 8).unwrap();
        let innermost = inner.nested(&b);
        assert_eq!(
            innermost.enter("a", 8).unwrap_err(),
            EvalError::CyclicSubstitution("a".to_string())
        );
        assert!(innermost.enter("c", 8).is_ok());
    }

    #[test]
    fn test_frame_tracks_walk_depth() {
        let frame = Frame::new(None).deeper().deeper();
        let a = frame.enter("a", 8).unwrap();
        assert_eq!(frame.nested(&a).depth, 2);
        let params = Parameters::new();
        assert_eq!(frame.with_params(&params).deeper().depth, 3);
    }

    #[test]
    fn test_frame_depth_limit() {
        let frame = Frame::new(None);
        let a = frame.enter("a", 1).unwrap();
        let inner = frame.nested(&a);
        assert!(matches!(
            inner.enter("b", 1),
            Err(EvalError::SubstitutionTooDeep { limit: 1, .. })
        ));
    }
}
