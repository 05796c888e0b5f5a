use std::collections::BTreeSet;

/// The keyword emitted in front of a forwarded call when the method returns a value.
pub const RETURN_KEYWORD: &str = "return";

const VOID: &str = "void";

/// Whether a method hands back a value, decided once per descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnKind {
    Void,
    Value,
}

impl ReturnKind {
    pub fn return_statement(self) -> &'static str {
        match self {
            Self::Void => "",
            Self::Value => RETURN_KEYWORD,
        }
    }
}

/// How return-type tokens are recognised as void.
///
/// `Literal` only matches the exact token `void`. A typedef of void is treated as a
/// value type and gets a `return` in front of it, which the downstream compiler
/// will reject. `Aliased` additionally accepts the declared spellings.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum VoidDetection {
    #[default]
    Literal,
    Aliased(BTreeSet<String>),
}

impl VoidDetection {
    pub fn aliased<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Aliased(aliases.into_iter().map(|a| normalize(a.as_ref())).collect())
    }

    pub fn classify(&self, return_type: &str) -> ReturnKind {
        let void = match self {
            Self::Literal => is_void(return_type),
            Self::Aliased(aliases) => {
                let token = normalize(return_type);
                token == VOID || aliases.contains(&token)
            }
        };

        if void {
            ReturnKind::Void
        } else {
            ReturnKind::Value
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Literal => "literal `void` token".to_string(),
            Self::Aliased(aliases) => {
                let aliases = aliases.iter().map(String::as_str).collect::<Vec<_>>();
                format!("`void` plus aliases [{}]", aliases.join(", "))
            }
        }
    }
}

/// Literal token test: only the identifier `void` is void.
pub fn is_void(return_type: &str) -> bool {
    return_type.trim() == VOID
}

pub fn return_statement(return_type: &str) -> &'static str {
    VoidDetection::Literal.classify(return_type).return_statement()
}

fn normalize(token: &str) -> String {
    token.split_whitespace().collect::<Vec<_>>().join(" ")
}
