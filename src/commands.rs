/// Commands read from the terminal while a review is playing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Toggle autoplay with the fixed delay
    ToggleFixed,
    /// Toggle autoplay following recorded move times
    ToggleRealtime,
    /// Stop autoplay
    Stop,
    /// Stop and exit
    Quit,
}

impl Command {
    /// Parse one input line, ignoring case and surrounding whitespace
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "p" | "play" => Some(Self::ToggleFixed),
            "r" | "realtime" => Some(Self::ToggleRealtime),
            "s" | "stop" => Some(Self::Stop),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }

    pub fn help() -> &'static str {
        "p: toggle fixed delay, r: toggle realtime, s: stop, q: quit"
    }
}
