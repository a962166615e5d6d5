use std::process::ExitCode;

fn main() -> ExitCode {
    interiq_cli::run()
}
