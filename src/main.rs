fn main() {
    if let Err(err) = movies_etl::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
