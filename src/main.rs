use anyhow::Context;
use pipesh::{Config, Interpreter, signals};

fn main() -> anyhow::Result<()> {
    let config: Config = argh::from_env();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();

    signals::swallow_interrupts().context("failed to install SIGINT handler")?;

    let mut sh = Interpreter::new(&config);
    if !config.quiet {
        sh.print_banner(&mut std::io::stdout())?;
    }
    sh.repl()?;

    // history goes with the interpreter
    drop(sh);
    Ok(())
}
