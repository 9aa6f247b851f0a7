/// Declaration modifiers. Their hold on runtime behavior is purely
/// informational — per spec they are recorded on the declaration node but
/// not enforced by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Const,
    Static,
    Global,
    Local,
    Auto,
}

impl Modifier {
    pub fn from_keyword(word: &str) -> Option<Modifier> {
        match word {
            "const" => Some(Modifier::Const),
            "static" => Some(Modifier::Static),
            "global" => Some(Modifier::Global),
            "local" => Some(Modifier::Local),
            "auto" => Some(Modifier::Auto),
            _ => None,
        }
    }
}
