use super::AnalyzeCommand;
use crate::Invoke;
use analyze_native::NativeCodeAnalyzerFactory;
use diagnostics::Diagnostics;
use resolve_native::NativeSymbolBag;

impl Invoke for AnalyzeCommand {
    fn invoke(self) -> Result<(), ()> {
        let AnalyzeCommand { filename, options } = self;

        let text = std::fs::read_to_string(&filename).map_err(|err| {
            eprintln!("error: Failed to read '{}': {}", filename, err);
        })?;

        let mut analyzer = NativeCodeAnalyzerFactory::create(options.os);
        {
            let analyzer_options = analyzer.options_mut();
            analyzer_options.follow_includes = options.follow_includes;
            analyzer_options.include_paths = options.include_paths;
            analyzer_options.trace = options.trace;
        }

        for define in options.defines {
            analyzer.add_initial_macro(define);
        }

        if options.preprocess_only {
            let preprocessed = analyzer.run_preprocessor(&text);
            println!("{}", preprocessed.text);
            return report(&preprocessed.diagnostics);
        }

        let mut diagnostics = Diagnostics::default();
        let result = analyzer.analyze(&text);
        let mut bag = NativeSymbolBag::create_from(result, Vec::new(), &mut diagnostics);
        bag.try_resolve_symbols_and_values(&mut diagnostics);

        print!(
            "{}",
            bag.graph().print_all(bag.find_resolved_native_symbols())
        );

        report(&diagnostics)
    }
}

fn report(diagnostics: &Diagnostics) -> Result<(), ()> {
    diagnostics.print_all();

    if diagnostics.has_errors() {
        Err(())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnalyzeOptions, Command};
    use std::path::PathBuf;

    fn header(name: &str, text: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cli_{}_{}.h", name, std::process::id()));
        std::fs::write(&path, text).unwrap();
        path
    }

    fn analyze(path: &PathBuf, options: AnalyzeOptions) -> Result<(), ()> {
        let result = AnalyzeCommand {
            filename: path.to_string_lossy().into_owned(),
            options,
        }
        .invoke();

        std::fs::remove_file(path).unwrap();
        result
    }

    #[test]
    fn resolved_headers_succeed() {
        let path = header("resolved", "typedef int INT;\nINT WINAPI p1(INT a);\n");
        assert_eq!(analyze(&path, AnalyzeOptions::default()), Ok(()));
    }

    #[test]
    fn unresolved_names_fail() {
        let path = header("unresolved", "void p1(MISSING a);\n");
        assert_eq!(analyze(&path, AnalyzeOptions::default()), Err(()));
    }

    #[test]
    fn preprocess_only() {
        let path = header("preprocess", "#error stop\n");

        let options = AnalyzeOptions {
            preprocess_only: true,
            ..Default::default()
        };

        assert_eq!(analyze(&path, options), Err(()));
    }

    #[test]
    fn missing_files_fail() {
        let command = Command::parse_args(["/does/not/exist.h".to_string()]).unwrap();
        assert_eq!(command.invoke(), Err(()));
    }
}
