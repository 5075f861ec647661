use clap::Parser;

use wirechat::cli::ClientArgs;
use wirechat::client::{stdout_callback, Client};
use wirechat::err::Error;

fn main() {
    env_logger::init();
    let args = ClientArgs::parse();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: ClientArgs) -> Result<(), Error> {
    let username = args.user.clone().ok_or(Error::MissingUsername)?;
    let client = Client::bind(&args, username, stdout_callback())?;
    client.run()
}
