use clap::Parser;

use urlshortener::cli::{Cli, Commands};
use urlshortener::config::init_config;
use urlshortener::runtime::modes::{run_cli_command, run_server};
use urlshortener::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::RunServer);

    // config-gen 不需要加载配置
    if command == Commands::ConfigGen {
        print!("{}", urlshortener::config::AppConfig::sample_toml());
        return Ok(());
    }

    let config = match init_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            std::process::exit(1);
        }
    };

    match command {
        Commands::RunServer => {
            let _guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("{}", e.format_colored());
                    std::process::exit(1);
                }
            };
            run_server(config).await
        }
        cmd => {
            if let Err(e) = run_cli_command(cmd, &config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
