use tiny_lisp::cmdline;

fn main() -> Result<(), cmdline::Error> {
    pretty_env_logger::init();
    let args = std::env::args().collect();
    cmdline::launch(args)
}
