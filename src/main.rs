fn main() -> std::process::ExitCode {
    labsmart_lib::run()
}
