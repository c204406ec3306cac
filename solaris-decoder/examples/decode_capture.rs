//! Standalone capture decoder
//!
//! Decodes a raw byte capture of the controller's serial output and prints
//! each published value together with decoder statistics.
//!
//! Usage:
//!   decode_capture <capture.bin> [--lang <de|en|fr|it|es>]
//!
//! Example:
//!   decode_capture solaris.log --lang de

use solaris_decoder::{DecoderConfig, Field, Language, SensorSinks, SensorValue, SolarisDecoder};
use std::env;
use std::fs;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <capture.bin> [--lang <code>]", args[0]);
        std::process::exit(1);
    }

    let mut language = Language::default();
    let mut i = 2;
    while i < args.len() {
        if args[i] == "--lang" && i + 1 < args.len() {
            language = Language::from_code_or_default(&args[i + 1]);
            i += 2;
        } else {
            i += 1;
        }
    }

    let data = match fs::read(&args[1]) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args[1], e);
            std::process::exit(1);
        }
    };

    let mut sinks = SensorSinks::new();
    for field in Field::ALL {
        let sensor = field.sensor();
        sinks.set(
            field,
            Box::new(move |value: SensorValue<'_>| {
                println!(
                    "{:<30} {} {}",
                    sensor.display_name(language),
                    value,
                    sensor.unit.unwrap_or("")
                );
            }),
        );
    }

    let config = DecoderConfig::new().with_language(language);
    let mut decoder = match SolarisDecoder::new(config, sinks) {
        Ok(decoder) => decoder,
        Err(e) => {
            eprintln!("Failed to create decoder: {}", e);
            std::process::exit(1);
        }
    };

    // A capture has no timing information, so the whole file is one poll
    decoder.process(&data, 0);

    let stats = decoder.stats();
    println!("\n=== DECODING SUMMARY ===");
    println!("Lines received: {}", stats.lines);
    println!("Records published: {}", stats.records);
    println!("Banners ignored: {}", stats.banners);
    println!("Lines rejected: {}", stats.rejected);
}
