use crate::{SymbolGraph, SymbolRef};
use std::fmt::Write;

impl SymbolGraph {
    /// Prints a symbol and everything below it as `Name(child)(child)`.
    ///
    /// A symbol met again while printing its own children is printed by name only.
    pub fn print(&self, key: SymbolRef) -> String {
        let mut out = String::new();
        let mut path = Vec::new();
        self.print_into(key, &mut path, &mut out);
        out
    }

    fn print_into(&self, key: SymbolRef, path: &mut Vec<SymbolRef>, out: &mut String) {
        let Some(symbol) = self.get(key) else {
            return;
        };

        out.push_str(&symbol.name);

        if path.contains(&key) {
            return;
        }

        path.push(key);

        for child in symbol.children() {
            out.push('(');
            self.print_into(child, path, out);
            out.push(')');
        }

        path.pop();
    }

    /// Prints each symbol on its own line.
    pub fn print_all(&self, keys: impl IntoIterator<Item = SymbolRef>) -> String {
        let mut out = String::new();

        for key in keys {
            // Writing to a `String` cannot fail
            let _ = writeln!(out, "{}", self.print(key));
        }

        out
    }
}
