use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

fn main() {
    println!("cargo::rerun-if-changed=assets");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    let out_path = out_dir.join("assets.rs");
    let mut out = File::create(&out_path).unwrap();
    emit_dir(&mut out, &assets);
    println!("cargo::rustc-env=FOLIO_ASSETS={}", out_path.display());
}

/// Emits one module per directory and one `&str` constant per file.
fn emit_dir(out: &mut File, dir: &Path) {
    let mut entries = dir
        .read_dir()
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .collect::<Vec<_>>();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().into_string().unwrap();
        let path = entry.path();

        if path.is_dir() {
            writeln!(out, "pub mod {} {{", identifier(&name)).unwrap();
            emit_dir(out, &path);
            writeln!(out, "}}").unwrap();
        } else {
            writeln!(
                out,
                "pub const {}: &str = ::core::include_str!({:?});",
                identifier(&name).to_uppercase(),
                path,
            )
            .unwrap();
        }
    }
}

/// `main.js` -> `main_js`
fn identifier(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
