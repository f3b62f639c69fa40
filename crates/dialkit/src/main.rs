use clap::{Parser, Subcommand};
use dialkit::SOCKET_PATH;
use dialkit::persist::PersistedState;
use dialkit::storage::JsonFileStorage;
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "dialkit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show the FAQ widget
    Show,
    /// Hide the FAQ widget
    Hide,
    /// Toggle the FAQ widget
    Toggle,
    /// Print the remembered position, selection and panel preference
    State,
    /// Forget the remembered position, selection and panel preference
    Reset,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show => send_command("show"),
        Commands::Hide => send_command("hide"),
        Commands::Toggle => send_command("toggle"),
        Commands::State => print_state(),
        Commands::Reset => reset_state(),
    }
}

fn print_state() -> anyhow::Result<()> {
    let storage = JsonFileStorage::open_default()?;
    let state = PersistedState::load(&storage);
    println!("file:             {}", storage.path().display());
    println!("position:         {}, {}", state.position.x, state.position.y);
    println!("selected:         {} ({})", state.selected.index(), state.selected);
    println!("description open: {}", state.description_open);
    Ok(())
}

fn reset_state() -> anyhow::Result<()> {
    let mut storage = JsonFileStorage::open_default()?;
    storage.clear()?;
    log::info!("Cleared {}", storage.path().display());
    Ok(())
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to faqdial at {}: {}. Is faqdial running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
