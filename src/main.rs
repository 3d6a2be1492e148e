use std::process::ExitCode;

fn main() -> ExitCode {
    mypy_bridge::app::startup::startup()
}
