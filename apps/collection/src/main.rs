fn main() -> anyhow::Result<()> {
    decksmith_collection::run()
}
