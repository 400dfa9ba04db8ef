//! Console commands. Anything that is not a `/command` is an alarm utterance.


/// Known desk commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    /// Remove by 1-based display position. `None` when the argument is missing or not a number.
    Remove(Option<usize>),
    Stop,
    Snooze,
    Cancel,
    History,
    /// Save history, optionally to a path other than the configured one.
    Save(Option<String>),
    /// Transcribe an audio file and schedule what it says.
    Listen(Option<String>),
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse a command from a console line. Returns `None` for plain text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }
        let (cmd, rest) = match text.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (text, ""),
        };
        let arg = (!rest.is_empty()).then(|| rest.to_string());

        let command = match cmd.to_lowercase().as_str() {
            "/list" | "/alarms" => Self::List,
            "/remove" | "/rm" => Self::Remove(rest.parse().ok()),
            "/stop" => Self::Stop,
            "/snooze" => Self::Snooze,
            "/cancel" => Self::Cancel,
            "/history" => Self::History,
            "/save" => Self::Save(arg),
            "/listen" => Self::Listen(arg),
            "/help" | "/?" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Unknown(cmd.to_string()),
        };
        Some(command)
    }
}

/// Help text listing every command.
pub fn help_text() -> &'static str {
    "Type a command such as \"set an alarm for 7:30 PM to call mom\".\n\
     \n\
     /list            show active alarms\n\
     /remove <n>      remove alarm number n from the list\n\
     /stop            stop the ringing alarm\n\
     /snooze          snooze the ringing alarm\n\
     /cancel          cancel the most recently set alarm before it rings\n\
     /history         show every alarm set this session\n\
     /save [path]     save alarm history to a file\n\
     /listen <file>   transcribe a recorded command\n\
     /help            show this help\n\
     /quit            exit"
}
