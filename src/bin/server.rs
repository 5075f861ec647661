use clap::Parser;

use wirechat::cli::ServerArgs;
use wirechat::server::Server;

fn main() -> Result<(), wirechat::Error> {
    env_logger::init();
    let args = ServerArgs::parse();

    let mut server = Server::bind(&args)?;
    server.run()
}
