use clap::{Parser, Subcommand};
use piekit::instance::{InstanceIdentity, InstanceName};
use piekit::launcher;
use std::time::SystemTime;

#[derive(Parser, Debug)]
#[command(name = "piekit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Logical instance to address
    #[arg(short = 'i', long, global = true, default_value = "default")]
    instance: String,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Ask the running pieswitch daemon to show its menu.
    Show,
    /// Resolve an app name the way the menu does and launch it.
    Open {
        /// App name, desktop id, or path
        name: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let identity = InstanceIdentity::from_env(InstanceName::new(cli.instance));

    match cli.command {
        Commands::Show => touch_trigger(&identity),
        Commands::Open { name } => {
            launcher::launch(&name, &identity.home)?;
            Ok(())
        }
    }
}

/// Any write to the trigger marker wakes the daemon that owns it.
fn touch_trigger(identity: &InstanceIdentity) -> anyhow::Result<()> {
    if !identity.trigger_file.exists() {
        anyhow::bail!(
            "No trigger marker at {}. Is pieswitch running for instance '{}'?",
            identity.trigger_file.display(),
            identity.name
        );
    }

    let file = fs_err::OpenOptions::new()
        .write(true)
        .open(&identity.trigger_file)?;
    file.file().set_modified(SystemTime::now())?;
    log::info!("touched {}", identity.trigger_file.display());
    Ok(())
}
