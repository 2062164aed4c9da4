fn main() {
    if let Err(err) = mindmap_gen::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
