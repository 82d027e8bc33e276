fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(error) = cobalt_assets::app::run_from_env() {
        log::error!("{}", error);
        std::process::exit(1);
    }
}
