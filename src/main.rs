//! evm-toolbelt command line entry point.
//!
//! ```text
//! evm-toolbelt [--chain main] [--fork true] [--proxy] <command>
//!     balance     --address <addr>
//!     balance-of  --token <addr> --address <addr>
//!     transfer    --sender <addr> --to <addr> --amount <ether>
//!     deploy      --contract <Name>
//! ```

use clap::Parser;

use evm_toolbelt::cli::{self, Cli};
use evm_toolbelt::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    tracing::debug!(chain = %cli.chain, fork = cli.fork, proxy = cli.proxy, "Starting");

    match cli::run(&cli).await {
        Ok(line) => {
            println!("{}", line);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            Err(e.into())
        }
    }
}
