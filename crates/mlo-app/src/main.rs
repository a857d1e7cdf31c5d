#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = mlo_app::run_from_env() {
        eprintln!("mlo: {error}");
        std::process::exit(error.exit_code());
    }
}
