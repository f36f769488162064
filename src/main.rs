fn main() -> anyhow::Result<()> {
    tl_cli::run()
}
