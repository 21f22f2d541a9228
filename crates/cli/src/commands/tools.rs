//! `marketscout tools` — list the registered research tools.

pub fn run(config_path: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let registry = super::build_registry(&config)?;

    println!("Registered tools ({:?} mode):", config.tools.mode);
    for (name, description) in registry.catalog() {
        println!("  {name:<20} {description}");
    }
    Ok(())
}
