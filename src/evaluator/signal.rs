use crate::value::Value;

/// The result of executing a statement or block.
///
/// `return`, `break` and `continue` are modeled as explicit, typed
/// transfers of control rather than host-language exceptions: a loop or
/// function body inspects the signal a nested block produced and decides
/// whether to absorb it (a loop absorbs `Break`/`Continue`) or propagate it
/// (a loop re-raises `Return`; a function absorbs `Return`).
#[derive(Debug, Clone)]
pub enum ControlFlow {
    Normal(Value),
    Return(Value),
    Break,
    Continue,
}

impl ControlFlow {
    pub fn is_normal(&self) -> bool {
        matches!(self, ControlFlow::Normal(_))
    }
}
