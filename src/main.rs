use miette::Result;

/// Main entry point for the gomodgraph CLI tool
fn main() -> Result<()> {
    // Install miette's panic and error handler for readable error reports
    miette::set_panic_hook();

    gomodgraph::run()
}
