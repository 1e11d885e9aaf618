use crate::{AnalyzerOptions, NativeCodeAnalyzer};
use build_pp::Macro;
use derive_more::{Display, IsVariant};

/// Version of Windows the headers are read for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, IsVariant)]
pub enum OsVersion {
    #[display("2000")]
    Windows2000,
    #[display("xp")]
    WindowsXP,
    #[display("2003")]
    Windows2003,
    #[default]
    #[display("vista")]
    WindowsVista,
}

impl OsVersion {
    pub const ALL: [OsVersion; 4] = [
        Self::Windows2000,
        Self::WindowsXP,
        Self::Windows2003,
        Self::WindowsVista,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|version| version.to_string() == name)
    }

    /// Value of `WINVER` and `_WIN32_WINNT`
    pub fn winver(&self) -> &'static str {
        match self {
            Self::Windows2000 => "0x0500",
            Self::WindowsXP => "0x0501",
            Self::Windows2003 => "0x0502",
            Self::WindowsVista => "0x0600",
        }
    }
}

/// Analyzers preconfigured for reading the Windows SDK headers.
pub struct NativeCodeAnalyzerFactory;

impl NativeCodeAnalyzerFactory {
    /// Analyzer for whole header files.
    pub fn create(os: OsVersion) -> NativeCodeAnalyzer {
        let mut analyzer = NativeCodeAnalyzer::new(AnalyzerOptions::default());

        // 64 bit annotations are dropped
        analyzer.add_initial_macro(Macro::new("__w64", ""));

        analyzer.add_initial_macro(Macro::new("_X86_", ""));
        analyzer.add_initial_macro(Macro::new("_WIN32", ""));
        analyzer.add_initial_macro(Macro::permanent("WINAPI", "__winapi"));
        analyzer.add_initial_macro(Macro::new("UNICODE", "1"));
        analyzer.add_initial_macro(Macro::new("__STDC__", "1"));

        analyzer.add_initial_macro(Macro::new("WINVER", os.winver()));
        analyzer.add_initial_macro(Macro::new("_WIN32_WINNT", os.winver()));

        analyzer.add_initial_macro(Macro::new("_MSC_VER", "9999"));
        analyzer.add_initial_macro(Macro::new("_MSC_FULL_VER", "99999999"));

        // Keeps the SAL annotations from expanding to nothing
        analyzer.add_initial_macro(Macro::new("_PREFAST_", ""));

        analyzer
    }

    /// Analyzer for a snippet that relies on macros the headers would have
    /// defined before it. Only the macros the snippet defines are reported.
    pub fn create_for_mini_parse(
        os: OsVersion,
        initial_macros: impl IntoIterator<Item = Macro>,
    ) -> NativeCodeAnalyzer {
        let mut analyzer = Self::create(os);
        analyzer.options_mut().include_initial_macros_in_result = false;

        for define in initial_macros {
            analyzer.add_initial_macro(define);
        }

        analyzer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use native_symbols::{CallingConvention, SymbolData};

    #[test]
    fn version_macros() {
        let text = indoc! {"
            #if _WIN32_WINNT >= 0x0600
            void vista(void);
            #else
            void older(void);
            #endif
        "};

        let vista = NativeCodeAnalyzerFactory::create(OsVersion::WindowsVista).analyze(text);
        assert_eq!(vista.symbols[0].name.name, "vista");
        assert_eq!(vista.macros["WINVER"].value, "0x0600");

        let xp = NativeCodeAnalyzerFactory::create(OsVersion::WindowsXP).analyze(text);
        assert_eq!(xp.symbols[0].name.name, "older");
        assert_eq!(xp.macros["_WIN32_WINNT"].value, "0x0501");
    }

    #[test]
    fn winapi_cannot_be_redefined() {
        let text = indoc! {"
            #define WINAPI __stdcall
            void WINAPI p1(void);
        "};

        let result = NativeCodeAnalyzerFactory::create(OsVersion::default()).analyze(text);
        assert!(!result.diagnostics.has_errors());

        let SymbolData::Procedure(procedure) = &result.graph[result.symbols[0].symbol].data else {
            unreachable!()
        };

        assert_eq!(procedure.calling_convention, CallingConvention::WinApi);
    }

    #[test]
    fn mini_parse_reports_own_macros() {
        let analyzer = NativeCodeAnalyzerFactory::create_for_mini_parse(
            OsVersion::Windows2000,
            [Macro::new("EXTRA", "5")],
        );

        let result = analyzer.analyze("#define OWN EXTRA\nint a[OWN];\n");
        assert_eq!(result.macros.keys().collect::<Vec<_>>(), ["OWN"]);
        assert!(analyzer.options().initial_macros.iter().any(|define| define.name == "_MSC_VER"));
    }

    #[test]
    fn os_names() {
        assert_eq!(OsVersion::from_name("xp"), Some(OsVersion::WindowsXP));
        assert_eq!(OsVersion::from_name("2003"), Some(OsVersion::Windows2003));
        assert_eq!(OsVersion::from_name("95"), None);
    }
}
