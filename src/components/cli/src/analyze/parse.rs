use super::{AnalyzeCommand, AnalyzeOptions};
use analyze_native::{Macro, OsVersion};
use std::path::PathBuf;

impl AnalyzeCommand {
    pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ()> {
        let mut filename = None;
        let mut options = AnalyzeOptions::default();

        while let Some(option) = args.next() {
            match option.as_str() {
                "--follow-includes" => options.follow_includes = true,
                "--trace" => options.trace = true,
                "--preprocess-only" => options.preprocess_only = true,
                "-I" => {
                    let Some(path) = args.next() else {
                        eprintln!("error: Expected include path after '-I'");
                        return Err(());
                    };

                    options.include_paths.push(PathBuf::from(path));
                }
                "-D" => {
                    let Some(define) = args.next() else {
                        eprintln!("error: Expected macro definition after '-D'");
                        return Err(());
                    };

                    options.defines.push(parse_define(&define)?);
                }
                "--os" => {
                    let Some(os) = args.next().and_then(|name| OsVersion::from_name(&name)) else {
                        eprintln!("error: Expected one of 2000, xp, 2003 or vista after '--os'");
                        return Err(());
                    };

                    options.os = os;
                }
                _ => {
                    if filename.replace(option).is_some() {
                        eprintln!("error: Multiple filenames specified");
                        return Err(());
                    }
                }
            }
        }

        let Some(filename) = filename else {
            eprintln!("error: No filename specified");
            return Err(());
        };

        Ok(Self { filename, options })
    }
}

/// `NAME` or `NAME=VALUE`, a bare name is defined as `1`.
fn parse_define(define: &str) -> Result<Macro, ()> {
    let (name, value) = define.split_once('=').unwrap_or((define, "1"));

    if name.is_empty() {
        eprintln!("error: Expected macro name in '-D {}'", define);
        return Err(());
    }

    Ok(Macro::new(name, value))
}
