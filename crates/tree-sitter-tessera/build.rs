use std::path::PathBuf;

use tessera_core::Grammar;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    let grammar_path = PathBuf::from(&manifest_dir).join("src/grammar.json");

    let json = std::fs::read_to_string(&grammar_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", grammar_path.display()));
    let grammar = Grammar::from_json(&json).unwrap_or_else(|e| panic!("invalid grammar.json: {e}"));
    let table = tessera_generate::generate(&grammar)
        .unwrap_or_else(|e| panic!("failed to compile the tessera grammar: {e}"));
    let bytes = table
        .to_bytes()
        .unwrap_or_else(|e| panic!("failed to serialize the parse table: {e}"));

    let artifact = PathBuf::from(&out_dir).join("tessera.tsra");
    std::fs::write(&artifact, bytes)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", artifact.display()));

    println!("cargo::rerun-if-changed=src/grammar.json");
    println!("cargo::rerun-if-changed=build.rs");
}
