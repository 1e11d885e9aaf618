mod analyze;
mod help;

pub use analyze::{AnalyzeCommand, AnalyzeOptions};
use enum_dispatch::enum_dispatch;
pub use help::HelpCommand;

#[enum_dispatch(Invoke)]
#[derive(Clone, Debug)]
pub enum Command {
    Help(HelpCommand),
    Analyze(AnalyzeCommand),
}

impl Command {
    pub fn parse() -> Result<Self, ()> {
        Self::parse_args(std::env::args().skip(1))
    }

    pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Self, ()> {
        let mut args = args.into_iter().peekable();

        match args.peek().map(String::as_str) {
            Some("-h" | "--help") | None => Ok(HelpCommand.into()),
            _ => AnalyzeCommand::parse(args).map(Self::from),
        }
    }
}

#[enum_dispatch]
pub trait Invoke {
    fn invoke(self) -> Result<(), ()>;
}
