/// A parsed type annotation. Stored on declarations and parameters for
/// round-tripping but never consulted by the evaluator — Chiron has no
/// static type checking.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeName {
    Simple(String),
    Generic {
        name: String,
        params: Vec<TypeName>,
    },
}

impl TypeName {
    pub fn simple(name: impl Into<String>) -> Self {
        TypeName::Simple(name.into())
    }
}
