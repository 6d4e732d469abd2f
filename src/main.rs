use std::path::PathBuf;

use clap::{Parser, Subcommand};

use linkba_sync::config::log_path;
use linkba_sync::plugin::{InitOptions, PluginManifest, initialize, status};

#[derive(Parser)]
#[command(name = "linkba-sync")]
#[command(version, about = "Web asset registration and startup refresh for ComfyUI-LaosHe-Linkba")]
struct Cli {
    /// Plugin directory containing the `web` folder
    #[arg(long, default_value = ".")]
    plugin_dir: PathBuf,

    /// Skip the remote refresh
    #[arg(long)]
    no_refresh: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run startup initialisation (the default)
    Sync,
    /// Print the locally cached version of each tracked resource
    Status,
    /// Print the registration manifest as JSON
    Manifest,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = linkba_sync::logging::init(Some(&log_path()));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command.unwrap_or(Command::Sync) {
        Command::Sync => {
            let options = InitOptions {
                refresh: !cli.no_refresh,
            };
            let manifest = runtime.block_on(initialize(&cli.plugin_dir, options));
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Command::Status => {
            for resource in runtime.block_on(status(&cli.plugin_dir)) {
                println!(
                    "{}\t{}\t{}\t{}",
                    resource.name,
                    resource.kind.as_str(),
                    resource.local_version.as_deref().unwrap_or("-"),
                    resource.content_path.display()
                );
            }
        }
        Command::Manifest => {
            let manifest = PluginManifest::new(&cli.plugin_dir);
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
    }

    Ok(())
}
