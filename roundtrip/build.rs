use std::path::PathBuf;
use std::{env, fs};

use rollabi_generator::{Generator, GeneratorOptions};
use rollabi_schema::{read_schema, EmptySchemaAction};

fn main() {
    println!("cargo:rerun-if-changed=schema.yaml");

    let document = fs::read("schema.yaml").expect("reading schema.yaml");
    let schema = read_schema(&document, EmptySchemaAction::Deny).expect("invalid schema.yaml");
    let options = GeneratorOptions {
        module: Some("bindings".to_string()),
    };
    let code = Generator::Rust
        .generate(&schema, &options)
        .expect("generating bindings");

    let out_dir = env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(PathBuf::from(out_dir).join("bindings.rs"), code).expect("writing bindings");
}
