use std::fs;

const DEFAULT_CONFIG: &str = "src/default_config.toml";
const TABLES: [&str; 4] = ["webhook", "messages", "html", "text"];

fn main() {
    println!("cargo:rerun-if-changed={DEFAULT_CONFIG}");

    let content = fs::read_to_string(DEFAULT_CONFIG)
        .unwrap_or_else(|e| panic!("cannot read {DEFAULT_CONFIG}: {e}"));

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("{DEFAULT_CONFIG} is not valid TOML: {e}"),
    };

    for name in TABLES {
        if !table.get(name).is_some_and(toml::Value::is_table) {
            panic!("{DEFAULT_CONFIG} is missing the [{name}] table");
        }
    }
}
