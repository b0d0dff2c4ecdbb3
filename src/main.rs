use casekit::{app::state::AppState, config::StartArgs};
use clap::Parser;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = StartArgs::parse();

    let app = match AppState::new(&args).await {
        Ok(app) => app,
        Err(e) => {
            e.print();
            return ExitCode::FAILURE;
        }
    };

    let result = casekit::app::cli::run(args.command, &app.services.record).await;

    app.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.print();
            ExitCode::FAILURE
        }
    }
}
