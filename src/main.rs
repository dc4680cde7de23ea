use std::process::ExitCode;
use env_logger::Env;
use sinplot::SineFigure;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .init();
    match SineFigure::default().render() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sinplot: {}", e);
            ExitCode::FAILURE
        }
    }
}
