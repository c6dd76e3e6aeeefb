use log::{LevelFilter, Log};
use yomidict::logging::CustomLogger;

fn main() {
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let code = yomidict::bootstrap::run_cli(std::env::args_os());
    log::logger().flush();
    std::process::exit(code);
}
