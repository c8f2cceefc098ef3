use std::io;

use flexi_logger::Logger;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr: stdout belongs to the protocol.
    let _logger = Logger::try_with_env_or_str("warn")?
        .format(flexi_logger::default_format)
        .start()?;
    dropfour::log_build_info();

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    dropfour::Engine::new(&mut input, &mut output).run()
}
