use clap::Parser;
use judger_cli::{cmd::GlobalArgs, logger};

#[tokio::main]
async fn main() {
    let app = GlobalArgs::parse();
    logger::init(app.verbose, app.quiet);
    app.exec_subcmd().await.unwrap_or_else(|e| {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    });
}
