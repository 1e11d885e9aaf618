mod conditional;
mod define;
mod depleted;
mod directive;
mod environment;
mod error;
mod expand;
mod line;

use build_native_token::{Scanner, ScannerOptions};
pub use conditional::{BranchError, ConditionalStack, MacroContext, evaluate_condition};
pub use define::{Macro, MacroArgument, MacroKind, MethodMacro};
use diagnostics::Diagnostics;
pub use environment::{Definition, Environment};
pub use error::{PreprocessorError, PreprocessorErrorKind};
pub use expand::expand_line;
use indexmap::IndexMap;
use itertools::Itertools;
pub use line::PreprocessorLine;
use native_token::TokenKind;
use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct PreprocessorOptions {
    pub follow_includes: bool,
    pub include_paths: Vec<PathBuf>,
    pub initial_macros: Vec<Macro>,

    /// Writes `// ` comments describing each decision into the output
    pub trace: bool,
}

#[derive(Debug)]
pub struct PreprocessorResult {
    pub text: String,
    pub macros: IndexMap<String, Macro>,
    pub diagnostics: Diagnostics,
}

/// Runs directives and expands macros, producing text for the declaration parser.
pub struct Preprocessor {
    options: PreprocessorOptions,
    environment: Environment,
    conditionals: ConditionalStack,
    diagnostics: Diagnostics,
    output: String,
}

impl Preprocessor {
    pub fn new(options: PreprocessorOptions) -> Self {
        let environment = Environment::new(options.initial_macros.iter().cloned());

        Self {
            options,
            environment,
            conditionals: ConditionalStack::default(),
            diagnostics: Diagnostics::default(),
            output: String::new(),
        }
    }

    pub fn process(mut self, text: &str) -> PreprocessorResult {
        self.process_text(text);

        if self.options.trace {
            self.trace_macro_map();
        }

        PreprocessorResult {
            text: self.output,
            macros: self.environment.macros,
            diagnostics: self.diagnostics,
        }
    }

    fn process_text(&mut self, text: &str) {
        let mut scanner = Scanner::new(text, ScannerOptions::preprocessor());
        let depth = self.conditionals.depth();

        loop {
            let line = PreprocessorLine::read(&mut scanner);

            if line.is_end_of_stream() {
                break;
            }

            if line.first.is_conditional_directive() {
                self.process_conditional(line);
                continue;
            }

            if !self.conditionals.is_active() {
                self.trace(format!("Skipped: {}", line.display_line()));
                continue;
            }

            match line.first {
                TokenKind::PoundDefine => self.process_define(&line),
                TokenKind::PoundUndef => self.process_undef(&line),
                TokenKind::PoundInclude => self.process_include(line),
                TokenKind::PoundError => self.process_error(&line),
                TokenKind::PoundPragma => (),
                _ => self.write_line(line),
            }
        }

        for location in self.conditionals.unwind_to(depth) {
            self.report(PreprocessorErrorKind::UnbalancedConditional.at(location));
        }
    }

    fn write_line(&mut self, line: PreprocessorLine) {
        for token in expand_line(line.tokens, &self.environment) {
            self.output.push_str(&token.value);
        }
    }

    fn report(&mut self, error: PreprocessorError) {
        error.report(&mut self.diagnostics);
    }

    fn trace(&mut self, message: impl AsRef<str>) {
        if self.options.trace {
            self.output.push_str("// ");
            self.output.push_str(message.as_ref());
            self.output.push('\n');
        }
    }

    fn trace_macro_map(&mut self) {
        let dump: Vec<String> = self
            .environment
            .macros
            .values()
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .map(|define| format!("{} -> {}", define.name, define.display_value()))
            .collect();

        self.trace("Macro Map Dump");
        for line in dump {
            self.trace(line);
        }
    }
}

/// Preprocesses text with the given options.
pub fn preprocess(text: &str, options: PreprocessorOptions) -> PreprocessorResult {
    Preprocessor::new(options).process(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn run(before: &str) -> PreprocessorResult {
        preprocess(before, PreprocessorOptions::default())
    }

    fn verify(before: &str, after: &str) -> IndexMap<String, Macro> {
        let result = run(before);
        assert_eq!(result.text, after);
        result.macros
    }

    fn value<'a>(macros: &'a IndexMap<String, Macro>, name: &str) -> &'a str {
        macros
            .get(name)
            .map(|define| define.value.as_str())
            .unwrap_or_else(|| panic!("could not find {} in the macro map", name))
    }

    fn condition(initial: &[(&str, &str)], expression: &str) -> bool {
        let options = PreprocessorOptions {
            initial_macros: initial
                .iter()
                .map(|(name, value)| Macro::new(*name, *value))
                .collect(),
            ..Default::default()
        };

        let text = format!("#if {}\ntrue\n#else\nfalse\n#endif", expression);
        preprocess(&text, options).text.starts_with("true")
    }

    const MACROS: [(&str, &str); 4] = [("m1", "true"), ("m2", "false"), ("m3", "1"), ("m4", "0")];

    #[test]
    fn conditionals() {
        let macros = verify("#define foo bar\n#if foo\nhello\n#endif", "hello\n");
        assert_eq!(value(&macros, "foo"), "bar");

        verify("#define foo bar\n#if foo\nhello\nworld\n#endif", "hello\nworld\n");
        verify("#define foo bar\n#if foo\nhello\n#else\nworld\n#endif", "hello\n");
        verify("#if foo\nhello\n#else\nworld\n#endif", "world\n");
        verify("#define foo bar\n#if bar\nhello\n#elseif foo\nworld\n#endif", "world\n");
        verify(
            "#define foo bar\n#if bar \nhello\n#elseif foo\nworld\n#else\nagain\n#endif",
            "world\n",
        );
        verify(
            "#define _PREFAST_\n#if !(defined(_midl)) && defined(_PREFAST_)\nhello\n#endif",
            "hello\n",
        );
    }

    #[test]
    fn spaced_directives() {
        let macros = verify(
            "#     define foo bar\n#     if bar\nhello\n#    elseif foo\nworld\n#    endif",
            "world\n",
        );
        assert_eq!(value(&macros, "foo"), "bar");

        verify(
            "#     define foo bar\n#     if defined foo \nhello\n#    else \nworld\n#    endif",
            "hello\n",
        );
    }

    #[test]
    fn bitwise_conditionals() {
        verify("#define FOO 1\n#if FOO & 1\nhello\n#endif", "hello\n");
        verify("#define FOO 1\n#if FOO & 2\nhello\n#endif", "");
        verify("#define FOO 1\n#if FOO | 2\nhello\n#endif", "hello\n");
    }

    #[test]
    fn nested_conditionals() {
        let text = indoc! {"
            #ifdef A
            #if 1
            a
            #else
            b
            #endif
            #elif defined(B)
            c
            #ifndef C
            d
            #endif
            #endif
        "};

        let options = PreprocessorOptions {
            initial_macros: vec![Macro::new("B", "")],
            ..Default::default()
        };

        let result = preprocess(text, options);
        assert_eq!(result.text, "c\nd\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn taken_branch_skips_evaluation() {
        let result = run("#if 1\na\n#elif 1 +\nb\n#endif");
        assert_eq!(result.text, "a\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn multiline_definitions() {
        let macros = verify("#define foo bar \\\nbaz\nhello", "hello\n");
        assert_eq!(value(&macros, "foo"), "bar baz");

        let macros = verify("#define foo bar \\\nbaz \\\nagain \nhello", "hello\n");
        assert_eq!(value(&macros, "foo"), "bar baz again");

        let macros = verify("#define foo bar \\\nbaz /*foo*/\\\n \nhello", "hello\n");
        assert_eq!(value(&macros, "foo"), "bar baz");

        let macros = verify("#define foo bar \\\nbaz /*foo*/\\\n // hello \nhello", "hello\n");
        assert_eq!(value(&macros, "foo"), "bar baz");
    }

    #[test]
    fn comments_are_removed() {
        verify("/* hello */\nworld\n", "\nworld\n");
        verify("hello\n/* hello */\nworld\n", "hello\n\nworld\n");
        verify("// hello */\nworld\n", "\nworld\n");
        verify("/* hello */ hello\nworld\n", " hello\nworld\n");
    }

    #[test]
    fn macro_map() {
        let macros = verify("#define foo bar\n#define bar foo", "");
        assert_eq!(value(&macros, "foo"), "bar");
        assert_eq!(value(&macros, "bar"), "foo");

        let macros = verify("#define foo /* hello */bar\n#define bar foo", "");
        assert_eq!(value(&macros, "foo"), "bar");

        let macros = verify("#define foo bar\n#undef foo", "");
        assert!(macros.is_empty());

        let macros = verify("#define foo bar\n#define /* hollow */ bar foo", "");
        assert_eq!(value(&macros, "bar"), "foo");
        assert!(macros.values().all(|define| define.is_from_parse));
    }

    #[test]
    fn parenthesized_values_are_not_methods() {
        verify("#define foo   (1)\nfoo\n", "(1)\n");
        verify("#define foo   ((2)1)\nfoo\n", "((2)1)\n");
    }

    #[test]
    fn evaluation() {
        assert!(condition(&[("foo", "bar")], "foo"));
        assert!(!condition(&MACROS, "foo"));
        assert!(condition(&MACROS, "defined(m1)"));
        assert!(condition(&MACROS, "(m1)"));
        assert!(condition(&MACROS, "foo || m1"));
        assert!(!condition(&MACROS, "foo  || bar"));
        assert!(condition(&MACROS, "m1 && m2"));
        assert!(!condition(&MACROS, "foo && m2"));
        assert!(condition(&MACROS, "m1 && 1"));
        assert!(condition(&MACROS, "defined(m1) || ab"));
        assert!(!condition(&MACROS, "((m1) || m2) && foo"));
        assert!(!condition(&MACROS, "defined(m5)"));
        assert!(condition(&MACROS, "!defined(m5)"));
        assert!(condition(&[("m1", "5"), ("m2", "6")], "m2 > m1"));
        assert!(condition(&[("m1", "5"), ("m2", "6")], "m2 >= m1"));
        assert!(condition(&[("m1", "0x5"), ("m2", "0x6")], "m2 > m1"));
        assert!(condition(&[("m1", "0x5"), ("m2", "0x6")], "m2 >= m1"));
    }

    #[test]
    fn replacement() {
        verify("#define foo bar\nfoo\n", "bar\n");
        verify("#define foo bar\nbaz\n", "baz\n");
        verify("#define foo /##/ \nfoo bar\n", "// bar\n");
        verify("#define m1(x) x##1 2\nm1(5)\n", "51 2\n");
    }

    #[test]
    fn methods() {
        verify("#define foo(x) x\nfoo(1)", "1\n");
        verify(
            "#define foo(x) x\nfoo(1)\nfoo(\"hello\")\nfoo(0x5)\n",
            "1\n\"hello\"\n0x5\n",
        );
        verify("#define foo(x)                   x\nfoo(1)\n", "1\n");
        verify(
            "#define foo(x,y) x y\nfoo(1,2)\nfoo(\"h\", \"y\")\n",
            "1 2\n\"hy\"\n",
        );
        verify("#define foo(x) #x\nfoo(1)\n", "\"1\"\n");
        verify("#define foo(x) #x\n\"h\"foo(1)\"y\"\n", "\"h1y\"\n");
        verify("#define foo(x) x##__\nfoo(y)\n", "y__\n");
        verify("#define foo(x,y) x##y\nfoo(y,z)\n", "yz\n");
        verify("#define foo(x) x\nfoo(y(0))\n", "y(0)\n");
    }

    #[test]
    fn nested_methods() {
        verify(
            "#define foo(x,y) x ## y\n#define foo2(x,y) x## y\n#define foo3(x,y) x ##y\nfoo(1,2)\nfoo2(3,4)\nfoo3(5,6)\n",
            "12\n34\n56\n",
        );
        verify("#define inner(x) x\n#define outer(x) inner(x)\nouter(5)\n", "5\n");
        verify(
            "#define inner(x,y) x##y\n#define outer(x,y) inner(x,y)\nouter(1,2)\n",
            "12\n",
        );
        verify("#define x(y) \"foo\" y \"bar\"\nx(\"hey\")\n", "\"fooheybar\"\n");
        verify("#define x(y) y\nx(a b)\n", "a b\n");
        verify("#define foo bar\n#define m1(x) x\nm1(foo 2)\n", "bar 2\n");
    }

    #[test]
    fn invocations_inside_arguments() {
        verify("#define f(x) x\nf(f(1))\n", "1\n");
        verify(
            "#define max(a,b) ((a)>(b)?(a):(b))\nmax(max(1,2),3)\n",
            "((((1)>(2)?(1):(2)))>(3)?(((1)>(2)?(1):(2))):(3))\n",
        );
        verify("#define g(x) g(x + 1)\ng(g(0))\n", "g(g(0 + 1) + 1)\n");
        verify(
            "#define ONE 1\n#define f(x) x #x\nf(ONE)\n",
            "1 \"ONE\"\n",
        );
    }

    #[test]
    fn conditionals_use_macro_values() {
        let text = indoc! {"
            #define WINVER (0x0600)
            #if WINVER >= 0x0501
            yes
            #else
            no
            #endif
        "};
        verify(text, "yes\n");

        let text = indoc! {"
            #define NTDDI_WINXP 0x05010000
            #define NTDDI_VISTA 0x06000000
            #define NTDDI_VERSION NTDDI_WINXP
            #if NTDDI_VERSION >= NTDDI_VISTA
            vista
            #elif NTDDI_VERSION >= 0x05010000
            xp
            #endif
        "};
        verify(text, "xp\n");
    }

    #[test]
    fn method_signature() {
        let macros = verify("#define add(a, b) a + b\n", "");
        let define = &macros["add"];
        assert!(define.kind.is_method());
        assert_eq!(define.value, "add()");
        assert_eq!(define.display_value(), "(a,b) a + b");
    }

    #[test]
    fn adjacent_strings() {
        verify("\"foo\"\"bar\"\n", "\"foobar\"\n");
        verify("\"foo\"     \"bar\"\n", "\"foobar\"\n");
    }

    #[test]
    fn unbalanced_conditionals() {
        let result = run("#ifndef WINAPI");
        assert_eq!(result.diagnostics.errors().count(), 0);
        assert_eq!(result.diagnostics.warnings().count(), 1);

        let result = run("#ifdef WINAPI\nhello");
        assert_eq!(result.text, "");
        assert_eq!(result.diagnostics.errors().count(), 0);
        assert_eq!(
            result.diagnostics.warnings().collect::<Vec<_>>(),
            ["Found unbalanced conditional preprocessor branch"]
        );

        let result = run("a\n#endif\nb\n");
        assert_eq!(result.text, "a\nb\n");
        assert_eq!(result.diagnostics.errors().count(), 1);

        let result = run("#else\n");
        assert_eq!(result.diagnostics.errors().count(), 1);
    }

    #[test]
    fn directive_diagnostics() {
        let result = run("#define\n#undef\n#undef a b\n#if 1 +\nx\n#endif\n#error stop here\n");
        assert_eq!(result.text, "");
        assert_eq!(
            result.diagnostics.warnings().collect::<Vec<_>>(),
            [
                "Encountered an empty #define",
                "Error processing #undef",
                "Error processing #undef"
            ]
        );
        assert_eq!(
            result.diagnostics.errors().collect::<Vec<_>>(),
            ["Could not evaluate expression #if 1 +", "#error stop here"]
        );
    }

    #[test]
    fn permanent_macros() {
        let options = PreprocessorOptions {
            initial_macros: vec![Macro::permanent("FOO", "BAR")],
            ..Default::default()
        };

        let result = preprocess("#define FOO BAZ\nFOO\n", options);
        assert_eq!(result.text, "BAR\n");
        assert!(!result.macros["FOO"].is_from_parse);
    }

    #[test]
    fn recursive_macros_terminate() {
        verify("#define A B\n#define B A\nA B\n", "A B\n");
        verify("#define f(x) f(x + 1)\nf(0)\n", "f(0 + 1)\n");
    }

    #[test]
    fn includes_are_dropped_unless_followed() {
        verify("#include <windows.h>\n#pragma once\na\n", "a\n");
    }

    #[test]
    fn follows_includes() {
        let directory = std::env::temp_dir().join(format!("build_pp_{}", std::process::id()));
        std::fs::create_dir_all(&directory).unwrap();
        std::fs::write(directory.join("inner.h"), "#define INNER 1\ninner\n").unwrap();

        let options = PreprocessorOptions {
            follow_includes: true,
            include_paths: vec![directory.clone()],
            ..Default::default()
        };

        let result = preprocess(
            "#include \"inner.h\"\n#include <missing.h>\n#if INNER\nouter\n#endif\n",
            options,
        );

        std::fs::remove_dir_all(&directory).unwrap();

        assert_eq!(result.text, "inner\nouter\n");
        assert_eq!(
            result.diagnostics.warnings().collect::<Vec<_>>(),
            ["Could not locate include file missing.h"]
        );
    }

    #[test]
    fn trace() {
        let options = PreprocessorOptions {
            trace: true,
            initial_macros: vec![Macro::permanent("P", "1")],
            ..Default::default()
        };

        let result = preprocess("#define P 2\n#define A 1\n#if A\n#endif\n#undef A\n", options);

        assert_eq!(
            result.text,
            concat!(
                "// Kept: P -> 1 Attempted Value 2\n",
                "// Defined: A -> 1\n",
                "// true: [if] [A] \n",
                "// Undefined: A\n",
                "// Macro Map Dump\n",
                "// P -> 1\n",
            )
        );
    }
}
