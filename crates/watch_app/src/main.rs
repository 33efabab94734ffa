fn main() -> anyhow::Result<()> {
    watch_app::run()
}
