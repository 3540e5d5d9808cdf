use dotenv::dotenv;
use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use toml::Value;

const KEY_LEN: usize = 32;
const IV_LEN: usize = 16;

fn write_str(out: &mut File, key: &str, value: &str) -> io::Result<()> {
    writeln!(out, "#[allow(unused)]\npub const APP_METADATA_{}: &str = \"{}\";", key.to_uppercase(), value)
}

fn write_bytes(out: &mut File, key: &str, value: &[u8]) -> io::Result<()> {
    let body = value.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ");
    writeln!(
        out,
        "#[allow(unused)]\npub const APP_METADATA_{}: &[u8; {}] = &[{}];",
        key.to_uppercase(),
        value.len(),
        body
    )
}

// Pads or truncates a default key material string to an exact length.
fn fit(mut s: String, len: usize) -> Vec<u8> {
    s.truncate(len);
    while s.len() < len {
        s.push('!');
    }
    s.into_bytes()
}

fn encryption_material() -> (Vec<u8>, Vec<u8>) {
    match (env::var("ENCRYPTION_KEY"), env::var("ENCRYPTION_IV")) {
        (Ok(key), Ok(iv)) => {
            if key.len() != KEY_LEN {
                panic!("ENCRYPTION_KEY must be exactly {} bytes long, got {}", KEY_LEN, key.len());
            }
            if iv.len() != IV_LEN {
                panic!("ENCRYPTION_IV must be exactly {} bytes long, got {}", IV_LEN, iv.len());
            }
            (key.into_bytes(), iv.into_bytes())
        }
        _ => {
            let name = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "evreg".to_string());
            println!("cargo:warning=ENCRYPTION_KEY or ENCRYPTION_IV not found in environment.");
            println!("cargo:warning=Using default keys. For production, create a .env file with:");
            println!("cargo:warning=ENCRYPTION_KEY=your_32_byte_key_here!!!!!!!!!");
            println!("cargo:warning=ENCRYPTION_IV=your_16_byte_iv!");
            (fit(format!("{}_default_encryption_key_32b", name), KEY_LEN), fit(format!("{}_iv_16b", name), IV_LEN))
        }
    }
}

fn main() -> io::Result<()> {
    // Load .env file if it exists
    let _ = dotenv();

    let out_dir = env::var("OUT_DIR").unwrap();
    let mut out = File::create(Path::new(&out_dir).join("app_metadata.rs"))?;

    write_str(&mut out, "NAME", &env::var("CARGO_PKG_NAME").unwrap())?;
    write_str(&mut out, "VERSION", &env::var("CARGO_PKG_VERSION").unwrap())?;

    // Expose [package.metadata] entries alongside the cargo-provided fields
    let cargo_toml = fs::read_to_string("Cargo.toml").expect("Failed to read Cargo.toml");
    let cargo_toml: Value = toml::from_str(&cargo_toml).expect("Failed to parse Cargo.toml");
    if let Some(metadata) = cargo_toml.get("package").and_then(|pkg| pkg.get("metadata")).and_then(|meta| meta.as_table()) {
        for (key, value) in metadata {
            if let Some(value) = value.as_str() {
                write_str(&mut out, key, value)?;
            }
        }
    }

    let (key, iv) = encryption_material();
    write_bytes(&mut out, "ENCRYPTION_KEY", &key)?;
    write_bytes(&mut out, "ENCRYPTION_IV", &iv)?;

    Ok(())
}
