use color_eyre::eyre::Result;
use tracing::debug;

use args::{Args, Commands};

mod args;
mod cmd;
mod logging;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::new();

    match &args.command {
        Commands::Init(cmd) => {
            logging::init(
                args.log_level.unwrap_or_default(),
                args.log_format.unwrap_or_default(),
            );
            debug!("Command-line parameters: {args:?}");

            cmd.run(&args.get_config_file_path()?)
        }

        Commands::Run(cmd) => {
            let config = args.load_config()?;

            logging::init(config.logging.log_level, config.logging.log_format);
            debug!("Command-line parameters: {args:?}");

            cmd.run(config)
        }
    }
}
