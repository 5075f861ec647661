use clap::Parser;

pub const DEFAULT_PORT: u16 = 15000;
pub const DEFAULT_ADDRESS: &str = "localhost";
pub const DEFAULT_WINDOW: u32 = 3;

/// Chat server: binds one datagram endpoint and routes messages between registered clients.
#[derive(Debug, Parser)]
#[command(name = "server")]
pub struct ServerArgs {
    /// The server port.
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The server bind address.
    #[arg(short = 'a', long = "address", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Nominal window size. Accepted for CLI compatibility; the protocol is stop-and-wait
    /// regardless of this value (see SPEC_FULL.md §9).
    #[arg(short = 'w', long = "window", default_value_t = DEFAULT_WINDOW)]
    pub window: u32,
}

/// Chat client: joins a server and exchanges line-oriented commands over a reliable
/// stop-and-wait session.
#[derive(Debug, Parser)]
#[command(name = "client")]
pub struct ClientArgs {
    /// The username to join as. Required; its absence is a configuration error (exit 1).
    #[arg(short = 'u', long = "user")]
    pub user: Option<String>,

    /// The server port.
    #[arg(short = 'p', long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// The server address.
    #[arg(short = 'a', long = "address", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Nominal window size. Accepted but unused in stop-and-wait.
    #[arg(short = 'w', long = "window", default_value_t = DEFAULT_WINDOW)]
    pub window: u32,
}
