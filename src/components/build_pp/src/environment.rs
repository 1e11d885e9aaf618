use crate::Macro;
use indexmap::IndexMap;

/// The macros currently defined, in order of first definition.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    pub macros: IndexMap<String, Macro>,
}

pub enum Definition<'a> {
    Added,
    Replaced,
    Kept(&'a Macro),
}

impl Environment {
    pub fn new(initial: impl IntoIterator<Item = Macro>) -> Self {
        let mut environment = Self::default();

        for define in initial {
            environment.macros.insert(define.name.clone(), define);
        }

        environment
    }

    /// Adds a definition unless a permanent macro of the same name exists.
    pub fn add_define(&mut self, define: Macro) -> Definition<'_> {
        match self.macros.get_index_of(&define.name) {
            Some(index) if self.macros[index].is_permanent => Definition::Kept(&self.macros[index]),
            Some(index) => {
                self.macros[index] = define;
                Definition::Replaced
            }
            None => {
                self.macros.insert(define.name.clone(), define);
                Definition::Added
            }
        }
    }

    pub fn find_define(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn remove_define(&mut self, name: &str) -> Option<Macro> {
        self.macros.shift_remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_macros_are_kept() {
        let mut environment = Environment::new([Macro::permanent("FOO", "BAR")]);

        match environment.add_define(Macro::new("FOO", "BAZ")) {
            Definition::Kept(kept) => assert_eq!(kept.value, "BAR"),
            _ => panic!("permanent macro was replaced"),
        }

        assert!(matches!(
            environment.add_define(Macro::new("A", "1")),
            Definition::Added
        ));
        assert!(matches!(
            environment.add_define(Macro::new("A", "2")),
            Definition::Replaced
        ));
        assert_eq!(environment.find_define("A").map(|m| m.value.as_str()), Some("2"));
        assert!(environment.remove_define("A").is_some());
        assert!(!environment.is_defined("A"));
    }
}
