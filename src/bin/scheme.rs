use rust_dmr_scheme::{cmdline, Interpreter};

fn main() -> Result<(), cmdline::CmdlineError> {
    pretty_env_logger::init();
    let interpreter = Interpreter::new();
    let args = std::env::args().collect();
    cmdline::launch(args, &interpreter)
}
