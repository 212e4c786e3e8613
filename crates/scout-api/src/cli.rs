use clap::Parser;

/// Scout, a football player Q&A backend with a tool-calling model loop.
#[derive(Parser, Debug)]
#[command(name = "scout-api", version, about)]
pub struct Args {
    /// Address to bind the HTTP server on.
    #[arg(short, long, default_value = "127.0.0.1:8090")]
    pub bind: String,

    /// Maximum model turns per request.
    #[arg(long, default_value_t = 5)]
    pub max_tool_rounds: u32,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
