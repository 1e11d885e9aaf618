use crate::{ParseError, Parser};
use native_expr::string_literal_value;
use native_symbols::SalEntryType::{self, *};
use native_token::TokenKind;

pub(crate) type SalEntries = Vec<(SalEntryType, String)>;

/// Annotation keywords from the SAL headers, which expand to sequences of entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SalKeyword {
    In,
    Out,
    InOut,
    InOpt,
    OutOpt,
    InOutOpt,
    Ecount,
    Bcount,
    InEcount,
    InBcount,
    InEcountOpt,
    OutEcount,
    OutBcount,
    OutEcountOpt,
    OutEcountPart,
    OutEcountPartOpt,
    DerefOut,
    DerefOutOpt,
}

impl SalKeyword {
    fn from_word(word: &str) -> Option<Self> {
        Some(match word {
            "__in" => Self::In,
            "__out" => Self::Out,
            "__inout" => Self::InOut,
            "__in_opt" => Self::InOpt,
            "__out_opt" => Self::OutOpt,
            "__inout_opt" => Self::InOutOpt,
            "__ecount" => Self::Ecount,
            "__bcount" => Self::Bcount,
            "__in_ecount" => Self::InEcount,
            "__in_bcount" => Self::InBcount,
            "__in_ecount_opt" => Self::InEcountOpt,
            "__out_ecount" => Self::OutEcount,
            "__out_bcount" => Self::OutBcount,
            "__out_ecount_opt" => Self::OutEcountOpt,
            "__out_ecount_part" => Self::OutEcountPart,
            "__out_ecount_part_opt" => Self::OutEcountPartOpt,
            "__deref_out" => Self::DerefOut,
            "__deref_out_opt" => Self::DerefOutOpt,
            _ => return None,
        })
    }

    fn arity(&self) -> usize {
        match self {
            Self::In
            | Self::Out
            | Self::InOut
            | Self::InOpt
            | Self::OutOpt
            | Self::InOutOpt
            | Self::DerefOut
            | Self::DerefOutOpt => 0,
            Self::OutEcountPart | Self::OutEcountPartOpt => 2,
            _ => 1,
        }
    }

    fn entries(&self, arguments: &[String]) -> SalEntries {
        let first = arguments.first().map(String::as_str).unwrap_or_default();
        let second = arguments.get(1).map(String::as_str).unwrap_or_default();

        match self {
            Self::In => plain(&[Pre, Valid, Pre, Deref, ReadOnly]),
            Self::Out => {
                let mut entries = plain(&[NotNull]);
                entries.push((ElemWritableTo, "1".into()));
                entries.extend(plain(&[Post, Valid, Deref, NotReadOnly]));
                entries
            }
            Self::InOut => plain(&[Pre, Valid, Post, Valid, Deref, NotReadOnly]),
            Self::InOpt => [Self::In.entries(arguments), pre_maybe_null()].concat(),
            Self::OutOpt => [Self::Out.entries(arguments), maybe_null()].concat(),
            Self::InOutOpt => [Self::InOut.entries(arguments), pre_maybe_null()].concat(),
            Self::Ecount => vec![(NotNull, String::new()), (ElemWritableTo, first.into())],
            Self::Bcount => vec![(NotNull, String::new()), (ByteWritableTo, first.into())],
            Self::InEcount => {
                let mut entries = Self::In.entries(arguments);
                entries.push((Pre, String::new()));
                entries.push((ElemReadableTo, first.into()));
                entries
            }
            Self::InBcount => {
                let mut entries = Self::In.entries(arguments);
                entries.push((Pre, String::new()));
                entries.push((ByteReadableTo, first.into()));
                entries
            }
            Self::InEcountOpt => [Self::InEcount.entries(arguments), pre_maybe_null()].concat(),
            Self::OutEcount | Self::OutBcount => {
                let writable = if *self == Self::OutEcount {
                    ElemWritableTo
                } else {
                    ByteWritableTo
                };

                let mut entries = vec![(NotNull, String::new()), (writable, first.into())];
                entries.extend(plain(&[Post, Valid, Deref, NotReadOnly]));
                entries
            }
            Self::OutEcountOpt => [Self::OutEcount.entries(arguments), maybe_null()].concat(),
            Self::OutEcountPart => {
                let mut entries = Self::OutEcount.entries(arguments);
                entries.push((Post, String::new()));
                entries.push((ElemReadableTo, second.into()));
                entries
            }
            Self::OutEcountPartOpt => {
                [Self::OutEcountPart.entries(arguments), maybe_null()].concat()
            }
            Self::DerefOut => vec![
                (NotNull, String::new()),
                (ElemWritableTo, "1".into()),
                (Post, String::new()),
                (ElemReadableTo, "1".into()),
                (Post, String::new()),
                (Deref, String::new()),
                (NotNull, String::new()),
                (Post, String::new()),
                (Deref, String::new()),
                (ElemWritableTo, "1".into()),
                (Post, String::new()),
                (Deref, String::new()),
                (Valid, String::new()),
                (Deref, String::new()),
                (NotReadOnly, String::new()),
            ],
            Self::DerefOutOpt => [
                Self::DerefOut.entries(arguments),
                plain(&[Post, Deref, ExceptThat, MaybeNull]),
            ]
            .concat(),
        }
    }
}

fn plain(entry_types: &[SalEntryType]) -> SalEntries {
    entry_types
        .iter()
        .map(|entry_type| (*entry_type, String::new()))
        .collect()
}

fn maybe_null() -> SalEntries {
    plain(&[ExceptThat, MaybeNull])
}

fn pre_maybe_null() -> SalEntries {
    plain(&[Pre, ExceptThat, MaybeNull])
}

impl Parser {
    /// Reads the annotations in front of a type or declaration.
    ///
    /// Both the SAL keywords and their expanded `__declspec("SAL_...")` form
    /// are understood. Any other `__declspec` is skipped.
    pub(crate) fn process_sal(&mut self) -> Result<SalEntries, ParseError> {
        let mut entries = SalEntries::new();

        loop {
            let token = self.peek()?;

            if token.kind.is_decl_spec() {
                self.process_declspec(&mut entries)?;
                continue;
            }

            let keyword = token
                .kind
                .is_word()
                .then(|| SalKeyword::from_word(&token.value))
                .flatten();

            let Some(keyword) = keyword else {
                return Ok(entries);
            };

            let takes_arguments = keyword.arity() > 0;

            if takes_arguments {
                let peeked = self.scanner.peek_token_list(2);

                if !peeked.get(1).is_some_and(|next| next.kind.is_paren_open()) {
                    return Ok(entries);
                }
            }

            self.next()?;

            let arguments = if takes_arguments {
                self.process_sal_arguments()?
            } else {
                Vec::new()
            };

            entries.extend(keyword.entries(&arguments));
        }
    }

    /// Reads `(a, b)`, giving the source text of each argument.
    fn process_sal_arguments(&mut self) -> Result<Vec<String>, ParseError> {
        self.next_of_kind(TokenKind::ParenOpen)?;

        let mut arguments = Vec::new();
        let mut current = String::new();
        let mut depth = 0;

        loop {
            let token = self.next()?;

            match token.kind {
                TokenKind::Comma if depth == 0 => {
                    arguments.push(std::mem::take(&mut current));
                    continue;
                }
                TokenKind::ParenClose if depth == 0 => {
                    arguments.push(current);
                    return Ok(arguments);
                }
                TokenKind::ParenOpen => depth += 1,
                TokenKind::ParenClose => depth -= 1,
                _ => (),
            }

            current.push_str(&token.value);
        }
    }

    fn process_declspec(&mut self, entries: &mut SalEntries) -> Result<(), ParseError> {
        self.next_of_kind(TokenKind::DeclSpec)?;
        self.next_of_kind(TokenKind::ParenOpen)?;

        let directive = self.next()?;

        if directive.kind.is_paren_close() {
            return Ok(());
        }

        let text = if directive.kind.is_quoted_string() {
            string_literal_value(&directive.value)
                .unwrap_or_default()
                .to_string()
        } else {
            // Custom attributes such as `align(8)` are read whole and ignored
            let mut text = directive.value;
            let mut depth = 0;

            while depth > 0 || !self.peek()?.kind.is_paren_close() {
                let token = self.next()?;

                match token.kind {
                    TokenKind::ParenOpen => depth += 1,
                    TokenKind::ParenClose => depth -= 1,
                    _ => (),
                }

                text.push_str(&token.value);
            }

            text
        };

        if let Some(entry) = SalEntryType::from_directive(&text) {
            entries.push(entry);
        }

        self.next_of_kind(TokenKind::ParenClose)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sal_of(text: &str) -> SalEntries {
        Parser::new(text).process_sal().unwrap()
    }

    #[test]
    fn keywords() {
        assert_eq!(sal_of("__in int"), plain(&[Pre, Valid, Pre, Deref, ReadOnly]));
        assert_eq!(
            sal_of("__out_opt int"),
            [
                (NotNull, String::new()),
                (ElemWritableTo, "1".into()),
                (Post, String::new()),
                (Valid, String::new()),
                (Deref, String::new()),
                (NotReadOnly, String::new()),
                (ExceptThat, String::new()),
                (MaybeNull, String::new()),
            ]
        );
        assert_eq!(
            sal_of("__in_ecount(count * 2) int")[5..],
            [(Pre, String::new()), (ElemReadableTo, "count*2".into())]
        );
    }

    #[test]
    fn keyword_without_arguments_is_a_name() {
        assert!(sal_of("__ecount int").is_empty());
    }

    #[test]
    fn declspec_directives() {
        assert_eq!(
            sal_of("__declspec(\"SAL_pre\") __declspec(\"SAL_readableTo(elementCount(5))\") int"),
            [(Pre, String::new()), (ElemReadableTo, "5".into())]
        );
        assert!(sal_of("__declspec(align(8)) __declspec(dllimport) __declspec() int").is_empty());
    }
}
