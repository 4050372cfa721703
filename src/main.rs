// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{crate_version, Parser, Subcommand};
use drum_machine::controller::{keyboard, terminal, Controller, Driver};
use drum_machine::pads::PadRegistry;
use drum_machine::sounds::SoundResolver;
use drum_machine::surface::console::Console;
use drum_machine::surface::layout::Layout;
use drum_machine::surface::terminal::{ScreenGuard, Terminal};
use drum_machine::surface::Surface;
use drum_machine::{audio, config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A nine-pad keyboard drum machine."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the available audio output devices.
    Devices {},
    /// Lists the pads and where their sounds are loaded from.
    Pads {
        /// The path to the drum machine config.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Start will start the drum machine.
    Start {
        /// The path to the drum machine config.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Read one key per line from stdin instead of taking over the terminal.
        #[arg(long)]
        lines: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout belongs to the pads.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Devices {} => {
            let devices = audio::list_devices()?;

            if devices.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!("Devices:");
            for device in devices {
                println!("- {}", device);
            }
        }
        Commands::Pads { config } => {
            let config = config::load(config.as_deref())?;
            let resolver = SoundResolver::new(config.sound_base());

            println!("Pads:");
            for pad in PadRegistry::builtin().all() {
                println!("- {} -> {}", pad, resolver.resolve(pad.sound_id()));
            }
        }
        Commands::Start { config, lines } => {
            let config = config::load(config.as_deref())?;
            let layout = Layout::new(&PadRegistry::builtin());

            if lines {
                let surface: Arc<dyn Surface> = Arc::new(Console::stdout());
                let machine = Arc::new(config::init_drum_machine(&config, surface)?);
                let driver: Arc<dyn Driver> = Arc::new(keyboard::Driver::new());
                run(machine, driver).await?;
            } else {
                // Clips are loaded before the screen is taken over so load warnings stay visible.
                let terminal = Arc::new(Terminal::stdout(layout.clone()));
                let machine = Arc::new(config::init_drum_machine(&config, terminal.clone())?);

                let _guard = ScreenGuard::enter()?;
                terminal.draw()?;
                let driver: Arc<dyn Driver> = Arc::new(terminal::Driver::new(layout));
                run(machine, driver).await?;
            }
        }
    }

    Ok(())
}

async fn run(
    machine: Arc<drum_machine::machine::DrumMachine>,
    driver: Arc<dyn Driver>,
) -> Result<(), Box<dyn Error>> {
    let mut controller = Controller::mount(machine, driver);
    controller.join().await?;
    controller.unmount();
    info!("Goodbye.");
    Ok(())
}
