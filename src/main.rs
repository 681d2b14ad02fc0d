fn main() {
    bxast::cli::run();
}
