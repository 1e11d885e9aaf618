use crate::{SymbolData, SymbolGraph, SymbolRef, is_anonymous_name};
use itertools::Itertools;

impl SymbolGraph {
    /// Human readable form of a symbol, such as `int*`, `int (*f1)()` or `void p2(int i)`.
    pub fn display_name(&self, key: SymbolRef) -> String {
        let Some(symbol) = self.get(key) else {
            return "<null>".into();
        };

        match &symbol.data {
            SymbolData::Pointer { real_type } => format!("{}*", self.display_or_null(*real_type)),
            SymbolData::Array {
                real_type,
                element_count,
            } => {
                let suffix = match element_count {
                    Some(count) => format!("[{}]", count),
                    None => "[]".into(),
                };

                format!("{}{}", self.display_or_null(*real_type), suffix)
            }
            SymbolData::Builtin(builtin) => builtin.to_string(),
            SymbolData::BitVector { size } => format!("<bitvector {}>", size),
            SymbolData::FunctionPointer(function_pointer) => {
                let name = if is_anonymous_name(&symbol.name) {
                    "anonymous"
                } else {
                    &symbol.name
                };

                self.calculate_signature(function_pointer.signature, &format!("(*{})", name), false)
            }
            SymbolData::Procedure(procedure) => {
                self.calculate_signature(procedure.signature, &symbol.name, false)
            }
            SymbolData::Signature(_) => self.calculate_signature(key, "", false),
            SymbolData::SalAttribute { entries } => entries
                .iter()
                .map(|entry| self.display_name(*entry))
                .join(","),
            SymbolData::SalEntry { text, .. } if !text.is_empty() => {
                format!("{}({})", symbol.name, text)
            }
            SymbolData::ValueExpression(expression) => expression.expression.clone(),
            SymbolData::Value(value) => match (value.literal_text(), value.bound()) {
                (Some(text), _) => text,
                (None, Some(bound)) => self.display_name(bound),
                (None, None) => symbol.name.clone(),
            },
            _ => symbol.name.clone(),
        }
    }

    fn display_or_null(&self, key: Option<SymbolRef>) -> String {
        match key {
            Some(key) => self.display_name(key),
            None => "<null>".into(),
        }
    }

    /// Whether a SAL attribute has no entries.
    pub fn is_empty_sal(&self, key: SymbolRef) -> bool {
        match self.get(key).map(|symbol| &symbol.data) {
            Some(SymbolData::SalAttribute { entries }) => entries.is_empty(),
            _ => true,
        }
    }

    /// Renders a signature as `ret name(type param, ...)`, optionally with
    /// the SAL of the return type and of each parameter in front of them.
    pub fn calculate_signature(&self, signature: SymbolRef, name: &str, include_sal: bool) -> String {
        let Some(SymbolData::Signature(signature)) = self.get(signature).map(|symbol| &symbol.data)
        else {
            return name.to_string();
        };

        let mut text = String::new();

        if include_sal && !self.is_empty_sal(signature.return_sal) {
            text.push_str(&self.display_name(signature.return_sal));
            text.push(' ');
        }

        text.push_str(&self.display_name(signature.return_type));
        text.push(' ');
        text.push_str(name);
        text.push('(');

        let parameters = signature.parameters.iter().filter_map(|parameter| {
            let parameter_symbol = self.get(*parameter)?;
            let SymbolData::Parameter { ty, sal } = &parameter_symbol.data else {
                return None;
            };

            let mut text = String::new();

            if include_sal && !self.is_empty_sal(*sal) {
                text.push_str(&self.display_name(*sal));
                text.push(' ');
            }

            text.push_str(&self.display_name(*ty));

            if !parameter_symbol.name.is_empty() {
                text.push(' ');
                text.push_str(&parameter_symbol.name);
            }

            Some(text)
        });

        text.push_str(&parameters.collect::<Vec<_>>().join(", "));
        text.push(')');
        text
    }
}
