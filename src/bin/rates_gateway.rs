use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match intl_rates::server::start_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("rates-gateway: {e}");
            ExitCode::FAILURE
        }
    }
}
