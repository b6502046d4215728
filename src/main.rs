fn main() {
    if let Err(err) = weather_summary::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
