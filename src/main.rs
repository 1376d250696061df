fn main() {
    cfx_resolve::app::cli::run();
}
