// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the treecfg crate.
//!
//! This example demonstrates:
//! - Building a value tree with indexing and `append`
//! - Saving and loading it through the JSON and XML codecs
//! - Persisting typed settings with a `JsonConfigFile`
//! - Using default values for missing or mismatched keys
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use tempfile::TempDir;
use treecfg::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== treecfg: Basic Usage ===\n");

    let dir = TempDir::new().map_err(|e| TreeError::file_access(&std::env::temp_dir(), e))?;

    // Example 1: Build a value tree
    println!("--- Example 1: Value Trees ---");
    let mut root = Value::Null;
    root["player"]["name"] = Value::from("Rinoa");
    root["player"]["hp"] = Value::from(100);
    root["player"]["items"].append("potion");
    root["player"]["items"].append("phoenix down");
    println!("{}", root.dump());

    // Example 2: JSON round trip
    println!("\n--- Example 2: JSON ---");
    let json = JsonCodec::new();
    let json_path = dir.path().join("player.json");
    json.save(&root, &json_path)?;
    let from_json = json.load(&json_path)?;
    println!("{}", json.serialize(&from_json)?);
    println!("name: {}", from_json["player"]["name"].get_str());

    // Example 3: XML round trip
    println!("\n--- Example 3: XML ---");
    let xml = XmlCodec::new();
    let xml_path = dir.path().join("player.xml");
    xml.save(&root, &xml_path)?;
    let from_xml = xml.load(&xml_path)?;
    println!("{}", xml.serialize(&from_xml)?);
    println!("hp: {}", from_xml["player"]["hp"].get_int());

    // Example 4: Settings store
    println!("\n--- Example 4: Settings ---");
    let settings_path = dir.path().join("settings.json");
    {
        let mut cfg = JsonConfigFile::new(JsonCodec::new());
        if let Err(e) = cfg.set_filename(&settings_path) {
            println!("starting fresh: {}", e);
        }
        cfg.set_property("volume", 80);
        cfg.set_property("fullscreen", true);
        cfg.set_property("player", "Squall");
        // written when cfg goes out of scope
    }

    let cfg = JsonConfigFile::open(&settings_path, JsonCodec::new())?;
    println!("volume: {}", cfg.get_int("volume", 50));
    println!("fullscreen: {}", cfg.get_bool("fullscreen", false));
    println!("player: {}", cfg.get_string("player", "nobody"));

    // Example 5: Defaults
    println!("\n--- Example 5: Defaults ---");
    println!("missing key: {}", cfg.get_double("gamma", 2.2));
    println!("wrong type: {}", cfg.get_int("player", -1));

    println!("\n=== Done ===");
    Ok(())
}
