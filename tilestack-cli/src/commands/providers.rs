//! List the bundled tile providers.

use tilestack::config::ConfigFile;

use super::common::registry_from_config;

/// Run the providers command.
pub fn run(config: &ConfigFile) {
    let registry = registry_from_config(config);

    println!("{:>4}  {:<24} {:>5}  {}", "ID", "NAME", "ZOOM", "KIND");
    for (map_id, provider) in registry.iter() {
        let kind = if provider.is_elevation() {
            "elevation"
        } else {
            "imagery"
        };
        println!(
            "{:>4}  {:<24} {:>2}-{:<2}  {}",
            map_id.0,
            provider.name(),
            provider.min_zoom(),
            provider.max_zoom(),
            kind
        );
    }
}
