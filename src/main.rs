use std::io;

use clap::Parser;

use mt_hwstate::config::{Cli, Command, Config};
use mt_hwstate::input::dump::run_dump;
use mt_hwstate::pipeline::{open_device, Pipeline};
use mt_hwstate::touch::{EventTranslator, HwState};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Decode);

    let default_filter = match command {
        Command::Dump => "warn",
        Command::Decode => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::load(&cli);
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut reader = open_device(&config.device, config.event_size())?;

    match command {
        Command::Dump => {
            let stdout = io::stdout();
            let count = run_dump(&mut reader, &mut stdout.lock())?;
            log::info!("{} events dumped", count);
        }
        Command::Decode => {
            let caps = config
                .capabilities()
                .ok_or("unknown device profile")?;
            log::info!(
                "mt-hwstate starting (device={}, profile={}, semi_mt={})",
                config.device.display(),
                config.profile,
                config.semi_mt
            );
            let translator = EventTranslator::open(caps, config.params())?;
            let mut pipeline = Pipeline::new(reader, translator);
            pipeline.run(&mut |state: HwState| println!("{}", state));
        }
    }

    Ok(())
}
