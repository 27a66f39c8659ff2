mod commands;
mod terminal;

use commands::{CommandLine, Commands, probe, scan};
use subprobe_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose)?;

    let cfg = Config {
        no_banner: commands.no_banner,
        quiet: commands.quiet,
    };
    print::banner(cfg.no_banner, cfg.quiet);

    let result = match commands.command {
        Commands::Scan {
            domain,
            subfinder,
            args,
        } => {
            print::header("starting subdomain scan", cfg.quiet);
            scan::scan(domain, subfinder, args, &cfg).await
        }
        Commands::Probe { file, args } => {
            print::header("getting ready to probe", cfg.quiet);
            probe::probe(file, args, &cfg).await
        }
    };

    print::end_of_program(cfg.quiet);
    result
}
