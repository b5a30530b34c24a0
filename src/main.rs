use anyhow::Result;

fn main() -> Result<()> {
    adrian::cli::run()
}
