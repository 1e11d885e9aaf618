use derive_more::Display;

/// One annotation of the source annotation language attached to a parameter
/// or a return type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum SalEntryType {
    Null,
    NotNull,
    MaybeNull,
    ReadOnly,
    NotReadOnly,
    MaybeReadOnly,
    Valid,
    NotValid,
    MaybeValid,
    ReadableTo,
    ElemReadableTo,
    ByteReadableTo,
    WritableTo,
    ElemWritableTo,
    ByteWritableTo,
    Deref,
    Pre,
    Post,
    ExceptThat,
    InnerControlEntryPoint,
    InnerDataEntryPoint,
    InnerSucces,
    InnerCheckReturn,
    InnerTypefix,
    InnerOverride,
    InnerCallBack,
    InnerBlocksOn,
}

impl SalEntryType {
    pub const ALL: [SalEntryType; 27] = [
        Self::Null,
        Self::NotNull,
        Self::MaybeNull,
        Self::ReadOnly,
        Self::NotReadOnly,
        Self::MaybeReadOnly,
        Self::Valid,
        Self::NotValid,
        Self::MaybeValid,
        Self::ReadableTo,
        Self::ElemReadableTo,
        Self::ByteReadableTo,
        Self::WritableTo,
        Self::ElemWritableTo,
        Self::ByteWritableTo,
        Self::Deref,
        Self::Pre,
        Self::Post,
        Self::ExceptThat,
        Self::InnerControlEntryPoint,
        Self::InnerDataEntryPoint,
        Self::InnerSucces,
        Self::InnerCheckReturn,
        Self::InnerTypefix,
        Self::InnerOverride,
        Self::InnerCallBack,
        Self::InnerBlocksOn,
    ];

    /// Text of the `__declspec("...")` argument that produces this entry.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Null => "SAL_null",
            Self::NotNull => "SAL_notnull",
            Self::MaybeNull => "SAL_maybenull",
            Self::ReadOnly => "SAL_readonly",
            Self::NotReadOnly => "SAL_notreadonly",
            Self::MaybeReadOnly => "SAL_maybereadonly",
            Self::Valid => "SAL_valid",
            Self::NotValid => "SAL_notvalid",
            Self::MaybeValid => "SAL_maybevalid",
            Self::ReadableTo => "SAL_readableTo()",
            Self::ElemReadableTo => "SAL_readableTo(elementCount())",
            Self::ByteReadableTo => "SAL_readableTo(byteCount())",
            Self::WritableTo => "SAL_writableTo()",
            Self::ElemWritableTo => "SAL_writableTo(elementCount())",
            Self::ByteWritableTo => "SAL_writableTo(byteCount())",
            Self::Deref => "SAL_deref",
            Self::Pre => "SAL_pre",
            Self::Post => "SAL_post",
            Self::ExceptThat => "SAL_except",
            Self::InnerControlEntryPoint => "SAL_entrypoint(controlEntry, )",
            Self::InnerDataEntryPoint => "SAL_entrypoint(dataEntry, )",
            Self::InnerSucces => "SAL_success()",
            Self::InnerCheckReturn => "SAL_checkReturn",
            Self::InnerTypefix => "SAL_typefix",
            Self::InnerOverride => "__override",
            Self::InnerCallBack => "__callback",
            Self::InnerBlocksOn => "SAL_blocksOn()",
        }
    }

    /// Parses a directive, giving the entry type and the text of its innermost argument.
    ///
    /// `SAL_readableTo(elementCount(count))` yields `(ElemReadableTo, "count")`.
    pub fn from_directive(directive: &str) -> Option<(Self, String)> {
        let directive = directive.trim();

        if let Some(entry_type) = Self::find(directive) {
            return Some((entry_type, String::new()));
        }

        let (shape, text) = match (directive.rfind('('), directive.find(')')) {
            (Some(open), Some(close)) if open < close => {
                let shape = format!("{}{}", &directive[..=open], &directive[close..]);
                (shape, directive[open + 1..close].trim().to_string())
            }
            _ => (directive.to_string(), String::new()),
        };

        Self::find(&shape).map(|entry_type| (entry_type, text))
    }

    fn find(directive: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|entry_type| entry_type.directive() == directive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives() {
        assert_eq!(
            SalEntryType::from_directive("SAL_pre"),
            Some((SalEntryType::Pre, String::new()))
        );
        assert_eq!(
            SalEntryType::from_directive("SAL_writableTo(elementCount(size))"),
            Some((SalEntryType::ElemWritableTo, "size".into()))
        );
        assert_eq!(
            SalEntryType::from_directive("SAL_entrypoint(controlEntry, )"),
            Some((SalEntryType::InnerControlEntryPoint, String::new()))
        );
        assert_eq!(SalEntryType::from_directive("align(4)"), None);
    }

    #[test]
    fn every_directive_is_recognized() {
        for entry_type in SalEntryType::ALL {
            assert_eq!(
                SalEntryType::from_directive(entry_type.directive()).map(|(found, _)| found),
                Some(entry_type)
            );
        }
    }
}
