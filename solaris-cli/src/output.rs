//! Printing sinks for decoded observations

use crate::config::OutputFormat;
use serde::Serialize;
use solaris_decoder::{Field, Language, SensorInfo, SensorKind, SensorSinks, SensorValue, SENSORS};

/// One published value, as printed in JSON mode
#[derive(Debug, Serialize)]
struct Observation<'a> {
    timestamp: String,
    sensor: &'a str,
    name: &'a str,
    value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'a str>,
}

/// Format a value with the sensor's display precision
pub fn format_value(sensor: &SensorInfo, value: SensorValue<'_>) -> String {
    match value {
        SensorValue::Float(v) => format!("{:.*}", usize::from(sensor.accuracy), v),
        other => other.to_string(),
    }
}

fn json_value(value: SensorValue<'_>) -> serde_json::Value {
    match value {
        SensorValue::Binary(v) => serde_json::Value::from(v),
        SensorValue::Integer(v) => serde_json::Value::from(v),
        SensorValue::Float(v) => serde_json::Value::from(v),
        SensorValue::Text(v) => serde_json::Value::from(v),
    }
}

/// Render one observation as a single output line
pub fn render(
    sensor: &SensorInfo,
    language: Language,
    format: OutputFormat,
    value: SensorValue<'_>,
) -> String {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let name = sensor.display_name(language);

    match format {
        OutputFormat::Text => {
            let mut line = format!(
                "{} {} ({}): {}",
                timestamp,
                name,
                sensor.key,
                format_value(sensor, value)
            );
            if let Some(unit) = sensor.unit {
                line.push(' ');
                line.push_str(unit);
            }
            line
        }
        OutputFormat::Json => {
            let observation = Observation {
                timestamp,
                sensor: sensor.key,
                name,
                value: json_value(value),
                unit: sensor.unit,
            };
            serde_json::to_string(&observation).unwrap_or_else(|e| {
                log::error!("Failed to serialize observation: {}", e);
                String::new()
            })
        }
    }
}

/// Build stdout sinks for the given fields
pub fn stdout_sinks(fields: &[Field], language: Language, format: OutputFormat) -> SensorSinks {
    let mut sinks = SensorSinks::new();
    for &field in fields {
        let sensor = field.sensor();
        sinks.set(
            field,
            Box::new(move |value: SensorValue<'_>| {
                println!("{}", render(sensor, language, format, value));
            }),
        );
    }
    sinks
}

/// Print the sensor metadata table
pub fn print_sensor_table(language: Language) {
    println!(
        "{:<12} {:<28} {:<8} {:<6} {:<4} {}",
        "KEY", "NAME", "KIND", "UNIT", "DEC", "DEVICE CLASS"
    );
    for sensor in SENSORS.iter() {
        let kind = match sensor.kind {
            SensorKind::Numeric => "numeric",
            SensorKind::Binary => "binary",
            SensorKind::Text => "text",
        };
        println!(
            "{:<12} {:<28} {:<8} {:<6} {:<4} {}",
            sensor.key,
            sensor.display_name(language),
            kind,
            sensor.unit.unwrap_or("-"),
            sensor.accuracy,
            sensor.device_class.unwrap_or("-")
        );
    }
}
