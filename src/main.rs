use anyhow::{anyhow, Result};
use refit::cli::{handle_command, init_logging, parse_args, MAIN_STACK_SIZE};
use refit::observability::install_panic_hook;

fn main() -> Result<()> {
    install_panic_hook();
    let cli = parse_args();
    init_logging(cli.verbosity);

    // Tree walks recurse once per nesting level; run on a larger stack.
    let worker = std::thread::Builder::new()
        .name("refit-main".to_string())
        .stack_size(MAIN_STACK_SIZE)
        .spawn(move || handle_command(cli.command, cli.config, cli.verbosity))?;

    worker
        .join()
        .map_err(|_| anyhow!("refit worker thread panicked"))?
}
