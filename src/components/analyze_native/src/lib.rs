mod factory;
mod options;
mod result;

use build_native::parse;
pub use build_pp::{Macro, MacroKind};
use build_pp::{Preprocessor, PreprocessorOptions, PreprocessorResult};
pub use factory::{NativeCodeAnalyzerFactory, OsVersion};
use native_symbols::{NameKind, NativeName};
pub use options::AnalyzerOptions;
pub use result::{NativeCodeAnalyzerResult, NativeGlobalSymbol};
use std::path::Path;

/// Runs the preprocessor and then the declaration parser over header text.
#[derive(Clone, Debug, Default)]
pub struct NativeCodeAnalyzer {
    options: AnalyzerOptions,
}

impl NativeCodeAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut AnalyzerOptions {
        &mut self.options
    }

    /// Seeds a macro that is in place before the text is read.
    pub fn add_initial_macro(&mut self, mut define: Macro) {
        define.is_from_parse = false;
        self.options.initial_macros.push(define);
    }

    pub fn analyze_file(&self, path: &Path) -> std::io::Result<NativeCodeAnalyzerResult> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.analyze(&text))
    }

    pub fn analyze(&self, text: &str) -> NativeCodeAnalyzerResult {
        let preprocessed = self.run_preprocessor(text);

        let macros = preprocessed
            .macros
            .into_iter()
            .filter(|(_, define)| {
                self.options.include_initial_macros_in_result || define.is_from_parse
            })
            .collect();

        let mut diagnostics = preprocessed.diagnostics;
        let parsed = parse(&preprocessed.text);
        diagnostics.append(parsed.diagnostics);

        let symbols = parsed
            .defined_types
            .iter()
            .chain(&parsed.typedefs)
            .chain(&parsed.procedures)
            .chain(&parsed.enum_values)
            .filter_map(|key| {
                let symbol = parsed.graph.get(*key)?;
                let kind = NameKind::from_symbol_kind(symbol.kind())?;

                Some(NativeGlobalSymbol {
                    name: NativeName::new(kind, symbol.name.clone()),
                    symbol: *key,
                })
            })
            .collect();

        NativeCodeAnalyzerResult {
            macros,
            graph: parsed.graph,
            symbols,
            diagnostics,
        }
    }

    /// Only preprocesses the text, giving the text the declaration parser would read.
    pub fn run_preprocessor(&self, text: &str) -> PreprocessorResult {
        let options = PreprocessorOptions {
            follow_includes: self.options.follow_includes,
            include_paths: self.options.include_paths.clone(),
            initial_macros: self.options.initial_macros.clone(),
            trace: self.options.trace,
        };

        Preprocessor::new(options).process(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn symbols_in_declaration_order() {
        let text = indoc! {"
            #define FOO 1
            enum e1 { v1, v2 = FOO };
            struct s1 { int m1; };
            typedef struct s1 S1;
            int __stdcall p1(S1* s);
        "};

        let result = NativeCodeAnalyzer::default().analyze(text);

        assert!(result.diagnostics.is_empty());
        assert_eq!(
            result
                .symbols
                .iter()
                .map(|symbol| symbol.name.to_string())
                .collect::<Vec<_>>(),
            [
                "Enum e1",
                "Struct s1",
                "TypeDef S1",
                "Procedure p1",
                "EnumValue v1",
                "EnumValue v2",
            ]
        );
        assert_eq!(result.macros.len(), 1);
    }

    #[test]
    fn diagnostics_of_both_passes_are_kept() {
        let text = indoc! {"
            #endif
            int p1(int a, ...);
        "};

        let result = NativeCodeAnalyzer::default().analyze(text);

        assert_eq!(result.diagnostics.errors().count(), 1);
        assert_eq!(
            result.diagnostics.warnings().collect::<Vec<_>>(),
            ["Procedure p1 has a variable argument signature which is unsupported."]
        );
    }

    #[test]
    fn initial_macros_can_be_left_out() {
        let mut analyzer = NativeCodeAnalyzer::new(AnalyzerOptions {
            include_initial_macros_in_result: false,
            ..Default::default()
        });
        analyzer.add_initial_macro(Macro::new("SEEDED", "1"));

        let result = analyzer.analyze("#define PARSED SEEDED\n");

        assert_eq!(result.macros.keys().collect::<Vec<_>>(), ["PARSED"]);
    }

    #[test]
    fn analyzes_files() {
        let path = std::env::temp_dir().join(format!("analyze_native_{}.h", std::process::id()));
        std::fs::write(&path, "void p1(void);\n").unwrap();

        let result = NativeCodeAnalyzer::default().analyze_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(result.unwrap().symbols.len(), 1);
        assert!(
            NativeCodeAnalyzer::default()
                .analyze_file(Path::new("/does/not/exist.h"))
                .is_err()
        );
    }
}
