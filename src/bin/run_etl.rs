use std::process::ExitCode;

fn main() -> ExitCode {
    match homefacts::app::run_etl_app() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("etl run failed: {error}");
            ExitCode::FAILURE
        }
    }
}
