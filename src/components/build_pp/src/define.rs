use derive_more::IsVariant;
use itertools::Itertools;
use native_token::{Token, TokenKind, tokens_to_string};

/// A `#define`d name, either seeded before preprocessing or read from the text.
#[derive(Clone, Debug, PartialEq)]
pub struct Macro {
    pub name: String,
    pub value: String,
    pub kind: MacroKind,

    /// Permanent macros survive any later `#define` of the same name
    pub is_permanent: bool,

    /// Whether the macro was defined by the processed text rather than seeded
    pub is_from_parse: bool,
}

#[derive(Clone, Debug, PartialEq, IsVariant)]
pub enum MacroKind {
    Object,
    Method(MethodMacro),
}

impl Macro {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: MacroKind::Object,
            is_permanent: false,
            is_from_parse: false,
        }
    }

    pub fn permanent(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            is_permanent: true,
            ..Self::new(name, value)
        }
    }

    pub fn method(name: impl Into<String>, method: MethodMacro) -> Self {
        let name = name.into();

        Self {
            value: format!("{}()", name),
            name,
            kind: MacroKind::Method(method),
            is_permanent: false,
            is_from_parse: true,
        }
    }

    pub(crate) fn parsed(mut self) -> Self {
        self.is_from_parse = true;
        self
    }

    pub fn as_method(&self) -> Option<&MethodMacro> {
        match &self.kind {
            MacroKind::Method(method) => Some(method),
            MacroKind::Object => None,
        }
    }

    /// The value shown for this macro in traces and constants.
    pub fn display_value(&self) -> String {
        match &self.kind {
            MacroKind::Object => self.value.clone(),
            MacroKind::Method(method) => method.signature(),
        }
    }
}

/// Body of a function-like macro.
///
/// `full_body` is the replacement text exactly as written, `body` is the same
/// tokens with the whitespace around `##` removed.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodMacro {
    pub parameters: Vec<String>,
    pub body: Vec<Token>,
    pub full_body: Vec<Token>,
}

impl MethodMacro {
    pub fn new(parameters: Vec<String>, full_body: Vec<Token>) -> Self {
        let mut body = Vec::with_capacity(full_body.len());

        for (index, token) in full_body.iter().enumerate() {
            let is_whitespace = token.kind.is_white_space();
            let before_paste = is_pasting(&full_body, index + 1);
            let after_paste = index >= 2 && is_pasting(&full_body, index - 2);

            if !(is_whitespace && (before_paste || after_paste)) {
                body.push(token.clone());
            }
        }

        Self {
            parameters,
            body,
            full_body,
        }
    }

    /// Parameter list and body, such as `(a,b) a + b`.
    pub fn signature(&self) -> String {
        format!(
            "({}) {}",
            self.parameters.iter().join(","),
            tokens_to_string(&self.full_body)
        )
    }

    /// Substitutes the arguments of an invocation into the body.
    ///
    /// A parameter preceded by `#` is replaced by its argument in quotes, and
    /// the operands of `##` use the argument as written. Everywhere else the
    /// expanded argument is used. An invocation with the wrong number of
    /// arguments expands to nothing.
    pub fn replace(&self, arguments: &[MacroArgument]) -> Vec<Token> {
        if arguments.len() != self.parameters.len() {
            return Vec::new();
        }

        let argument_for = |token: &Token| {
            token
                .is_any_word()
                .then(|| self.parameters.iter().position(|name| *name == token.value))
                .flatten()
                .map(|index| &arguments[index])
        };

        let mut replaced = Vec::with_capacity(self.body.len());
        let mut index = 0;

        while index < self.body.len() {
            let token = &self.body[index];
            let next = self.body.get(index + 1);

            if token.kind.is_pound() {
                if next.is_some_and(|next| next.kind.is_pound()) {
                    replaced.push(token.clone());
                    replaced.push(self.body[index + 1].clone());
                    index += 2;
                    continue;
                }

                if let Some(argument) = next.and_then(argument_for) {
                    replaced.push(stringize(&argument.written));
                    index += 2;
                    continue;
                }
            }

            match argument_for(token) {
                Some(argument) if self.is_pasted(index) => {
                    replaced.extend(trim_layout(&argument.written).iter().cloned());
                }
                Some(argument) => replaced.extend(argument.expanded.iter().cloned()),
                None => replaced.push(token.clone()),
            }

            index += 1;
        }

        replaced
    }

    fn is_pasted(&self, index: usize) -> bool {
        is_pasting(&self.body, index + 1) || (index >= 2 && is_pasting(&self.body, index - 2))
    }
}

/// One argument of a function-like macro invocation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MacroArgument {
    /// Tokens as written, used by `#` and `##`
    pub written: Vec<Token>,

    /// Tokens after expanding the macros they use
    pub expanded: Vec<Token>,
}

impl MacroArgument {
    /// Argument that uses no macros.
    pub fn plain(tokens: Vec<Token>) -> Self {
        Self {
            expanded: tokens.clone(),
            written: tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.written.iter().all(Token::is_layout)
    }
}

fn is_pasting(tokens: &[Token], index: usize) -> bool {
    let kind_at = |index: usize| tokens.get(index).map(|token| token.kind);

    kind_at(index) == Some(TokenKind::Pound) && kind_at(index + 1) == Some(TokenKind::Pound)
}

fn trim_layout(tokens: &[Token]) -> &[Token] {
    let start = tokens
        .iter()
        .position(|token| !token.is_layout())
        .unwrap_or(tokens.len());

    let end = tokens
        .iter()
        .rposition(|token| !token.is_layout())
        .map_or(start, |last| last + 1);

    &tokens[start..end]
}

fn stringize(written: &[Token]) -> Token {
    let written = trim_layout(written);

    match written {
        [single] if single.kind.is_quoted_string() => single.clone(),
        _ => Token::new(
            TokenKind::QuotedStringAnsi,
            format!("\"{}\"", tokens_to_string(written)),
            written.first().map(|token| token.location).unwrap_or_default(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use build_native_token::{ScannerOptions, tokenize_text};

    fn method(parameters: &[&str], body: &str) -> MethodMacro {
        MethodMacro::new(
            parameters.iter().map(|name| name.to_string()).collect(),
            tokenize_text(body, ScannerOptions::preprocessor()),
        )
    }

    #[test]
    fn paste_ignores_surrounding_whitespace() {
        let foo = method(&["x", "y"], "x ## y");
        assert_eq!(tokens_to_string(&foo.body), "x##y");
        assert_eq!(tokens_to_string(&foo.full_body), "x ## y");
        assert_eq!(foo.signature(), "(x,y) x ## y");
    }

    fn argument(text: &str) -> MacroArgument {
        MacroArgument::plain(tokenize_text(text, ScannerOptions::preprocessor()))
    }

    #[test]
    fn stringizes_arguments() {
        let foo = method(&["x"], "#x");
        assert_eq!(tokens_to_string(&foo.replace(&[argument("1")])), "\"1\"");
        assert_eq!(tokens_to_string(&foo.replace(&[argument(" a + b ")])), "\"a + b\"");
        assert_eq!(tokens_to_string(&foo.replace(&[argument("\"a\"")])), "\"a\"");
    }

    #[test]
    fn written_and_expanded_arguments() {
        let foo = method(&["x"], "x #x x##_t");

        let used = MacroArgument {
            written: tokenize_text("ONE", ScannerOptions::preprocessor()),
            expanded: tokenize_text("1", ScannerOptions::preprocessor()),
        };

        assert_eq!(tokens_to_string(&foo.replace(&[used])), "1 \"ONE\" ONE##_t");
    }

    #[test]
    fn wrong_argument_count_expands_to_nothing() {
        let foo = method(&["x", "y"], "x y");
        assert!(foo.replace(&[argument("a")]).is_empty());
        assert!(argument("  ").is_empty());
    }

    #[test]
    fn object_and_method_values() {
        let object = Macro::permanent("WINAPI", "__winapi");
        assert!(object.is_permanent);
        assert!(object.kind.is_object());
        assert_eq!(object.display_value(), "__winapi");

        let method = Macro::method("m1", method(&["x"], "x + 1"));
        assert_eq!(method.value, "m1()");
        assert_eq!(method.display_value(), "(x) x + 1");
    }
}
