//! Parse markup, edit it and print it back
//!
//! Usage: `cargo run --example roundtrip -- [--html] [file]`

use dom::{DomSerializer, Node, SerializerConfig};
use loader::{LoadOptions, Loader};
use std::io::Read;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1).peekable();
    let html = args.peek().map(String::as_str) == Some("--html");
    if html {
        args.next();
    }

    let source = match args.next() {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let options = if html {
        LoadOptions::html()
    } else {
        LoadOptions::xml()
    };

    let mut arena = dom::DomArena::new();
    let doc = Loader::new(options).load_str(&mut arena, &source)?;
    println!("Parsed {} records", arena.len());

    // Mark the document element so the edit is visible
    if let Some(root) = doc.document_element(&arena)? {
        root.set_attribute(&mut arena, "data-roundtrip", "1")?;
        let elements = root.get_elements_by_tag_name(&arena, "*")?;
        println!("<{}> holds {} element(s)", root.tag_name(&arena)?, elements.length());
    }
    doc.normalize(&mut arena)?;

    let config = SerializerConfig {
        preserve_comment: true,
        preserve_white_space: true,
        ..SerializerConfig::default()
    };
    println!("{}", DomSerializer::with_config(config).serialize(&arena, doc.id())?);

    Ok(())
}
