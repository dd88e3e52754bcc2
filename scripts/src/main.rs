use clap::Parser;
use dao_scripts::{cli::Cli, commands::deploy_dao, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    deploy_dao(cli).await
}
