fn main() {
    env_logger::init();
    if let Err(err) = barcode_wheel::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
