mod invoke;

#[derive(Clone, Debug)]
pub struct HelpCommand;
