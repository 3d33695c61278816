//! Show the layer stack built from the configuration.

use tilestack::config::ConfigFile;
use tilestack::engine::KEY_COMPOSITE_MAP_ID;
use tilestack::layer::LayerStack;

use super::common::registry_from_config;

/// Run the layers command.
pub fn run(config: &ConfigFile) {
    let registry = registry_from_config(config);
    let stack = LayerStack::from_configuration(&config.layers, &registry);

    if stack.is_empty() {
        println!("No layer stack configured (set multiLayer = true in [layers])");
        return;
    }

    let served_as = config
        .layers
        .get(KEY_COMPOSITE_MAP_ID)
        .cloned()
        .unwrap_or_else(|| stack.layer(0).map_id().to_string());
    println!("Served as map id {}", served_as);
    println!();

    println!("{:>3}  {:>4}  {:<24} {:>7}  {}", "Z", "ID", "NAME", "OPACITY", "VISIBLE");
    for layer in stack.layers() {
        let name = registry
            .provider_for_id(layer.map_id())
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| layer.layer_name().to_string());
        println!(
            "{:>3}  {:>4}  {:<24} {:>7.2}  {}",
            layer.z_order(),
            layer.map_id(),
            name,
            layer.opacity(),
            if layer.visible() { "yes" } else { "no" }
        );
    }

    println!();
    println!("Composite key: {}", stack.generate_cache_key());
}
