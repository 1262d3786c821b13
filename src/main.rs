fn main() {
    if let Err(e) = destin::cli::main() {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
