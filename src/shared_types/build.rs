use agribot_core::{Action, App, Channel, Connectivity, Intent};
use anyhow::Result;
use crux_core::typegen::TypeGen;
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // Enums reached only through skipped or nested fields must be traced explicitly
    gen.register_type::<Intent>()?;
    gen.register_type::<Connectivity>()?;
    gen.register_type::<Channel>()?;
    gen.register_type::<Action>()?;

    let output_root = PathBuf::from("./generated");

    gen.typescript("shared_types", output_root.join("typescript"))?;
    gen.swift("SharedTypes", output_root.join("swift"))?;
    gen.java("com.agribot.remote.shared_types", output_root.join("java"))?;

    Ok(())
}
