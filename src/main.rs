fn main() {
    env_logger::init();
    glyphfix::cli::run_cli();
}
