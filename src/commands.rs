/// Interactive commands read from stdin while the dashboard runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Missing codes are sent as empty strings; the backend rejects them.
    Save { stock1: String, stock2: String },
    Refresh,
    Logout,
    Quit,
    Help,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "commands: save <stock1> <stock2> | refresh | logout | quit";

pub fn parse_command(line: &str) -> Command {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Command::Empty;
    };

    match verb.to_lowercase().as_str() {
        "save" => Command::Save {
            stock1: words.next().unwrap_or_default().to_string(),
            stock2: words.next().unwrap_or_default().to_string(),
        },
        "refresh" | "r" => Command::Refresh,
        "logout" => Command::Logout,
        "quit" | "exit" | "q" => Command::Quit,
        "help" | "?" => Command::Help,
        other => Command::Unknown(other.to_string()),
    }
}
