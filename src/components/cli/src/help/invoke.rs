use super::HelpCommand;
use crate::Invoke;
use indoc::indoc;

impl Invoke for HelpCommand {
    fn invoke(self) -> Result<(), ()> {
        print!(indoc! {"
            usage: native_headers [options] FILENAME

            options:
              --follow-includes         Read the files named by #include
              -I PATH                   Look for included files in PATH
              -D NAME[=VALUE]           Define a macro before reading
              --os {{2000,xp,2003,vista}} Windows version to read the headers for
              --trace                   Print each preprocessor step
              --preprocess-only         Print the preprocessed text and stop
        "});
        Err(())
    }
}
