//! Sensor metadata for the decoded fields
//!
//! Describes how each field is presented to a monitoring host: its stable
//! key, value kind, unit, display precision, device class, icon and
//! localized display name.

use crate::error_codes::Language;
use crate::types::{DecoderError, Field, Result};
use serde::Serialize;

/// Kind of value a sensor publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Numeric,
    Binary,
    Text,
}

/// Static description of one sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorInfo {
    pub field: Field,
    /// Stable configuration key (e.g. `solaris_tk`)
    pub key: &'static str,
    pub kind: SensorKind,
    pub unit: Option<&'static str>,
    /// Decimals shown for numeric sensors
    pub accuracy: u8,
    pub device_class: Option<&'static str>,
    pub state_class: Option<&'static str>,
    pub icon: &'static str,
}

const UNIT_PERCENT: &str = "%";
const UNIT_CELSIUS: &str = "°C";
const UNIT_LITERS_PER_MIN: &str = "l/min";
const UNIT_KILOWATT: &str = "kW";

const MEASUREMENT: Option<&str> = Some("measurement");

const fn numeric(
    field: Field,
    key: &'static str,
    unit: &'static str,
    accuracy: u8,
    device_class: Option<&'static str>,
    state_class: Option<&'static str>,
    icon: &'static str,
) -> SensorInfo {
    SensorInfo {
        field,
        key,
        kind: SensorKind::Numeric,
        unit: Some(unit),
        accuracy,
        device_class,
        state_class,
        icon,
    }
}

const fn binary(
    field: Field,
    key: &'static str,
    device_class: Option<&'static str>,
    icon: &'static str,
) -> SensorInfo {
    SensorInfo {
        field,
        key,
        kind: SensorKind::Binary,
        unit: None,
        accuracy: 0,
        device_class,
        state_class: None,
        icon,
    }
}

/// All sensors, in wire order
pub static SENSORS: [SensorInfo; 11] = [
    binary(Field::ManualOperation, "solaris_ha", None, "mdi:gesture-tap"),
    binary(Field::BurnerContact, "solaris_bk", Some("heat"), "mdi:electric-switch"),
    numeric(Field::PumpSpeed, "solaris_p1", UNIT_PERCENT, 0, None, None, "mdi:pump"),
    binary(Field::BoosterPump, "solaris_p2", Some("running"), "mdi:pump"),
    numeric(
        Field::CollectorTemperature,
        "solaris_tk",
        UNIT_CELSIUS,
        0,
        Some("temperature"),
        MEASUREMENT,
        "mdi:sun-thermometer",
    ),
    numeric(
        Field::ReturnTemperature,
        "solaris_tr",
        UNIT_CELSIUS,
        0,
        Some("temperature"),
        MEASUREMENT,
        "mdi:water-thermometer",
    ),
    numeric(
        Field::StorageTemperature,
        "solaris_ts",
        UNIT_CELSIUS,
        0,
        Some("temperature"),
        MEASUREMENT,
        "mdi:water-thermometer",
    ),
    numeric(
        Field::FlowTemperature,
        "solaris_tv",
        UNIT_CELSIUS,
        0,
        Some("temperature"),
        MEASUREMENT,
        "mdi:water-thermometer",
    ),
    numeric(
        Field::FlowRate,
        "solaris_df",
        UNIT_LITERS_PER_MIN,
        1,
        None,
        MEASUREMENT,
        "mdi:waves-arrow-right",
    ),
    SensorInfo {
        field: Field::ErrorCode,
        key: "solaris_err",
        kind: SensorKind::Text,
        unit: None,
        accuracy: 0,
        device_class: None,
        state_class: None,
        icon: "mdi:alert-decagram-outline",
    },
    numeric(
        Field::Power,
        "solaris_pwr",
        UNIT_KILOWATT,
        2,
        Some("power"),
        MEASUREMENT,
        "mdi:solar-power",
    ),
];

impl Field {
    /// Sensor metadata for this field
    pub fn sensor(self) -> &'static SensorInfo {
        &SENSORS[self.index()]
    }

    /// Stable configuration key of this field's sensor
    pub fn key(self) -> &'static str {
        self.sensor().key
    }

    /// Resolve a sensor key such as `solaris_tk`
    pub fn from_key(key: &str) -> Result<Field> {
        SENSORS
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.field)
            .ok_or_else(|| DecoderError::UnknownSensor(key.to_string()))
    }
}

impl SensorInfo {
    /// Display name in the given language
    pub fn display_name(&self, language: Language) -> &'static str {
        display_name(self.field, language)
    }
}

/// Localized display name of a field's sensor
pub fn display_name(field: Field, language: Language) -> &'static str {
    use Field::*;
    use Language::*;

    match (language, field) {
        (De, ManualOperation) => "Handbetrieb",
        (De, BurnerContact) => "Brennerkontakt",
        (De, PumpSpeed) => "Umwälzpumpe",
        (De, BoosterPump) => "Boosterpumpe",
        (De, CollectorTemperature) => "Kollektortemperatur",
        (De, ReturnTemperature) => "Rücklauftemperatur",
        (De, StorageTemperature) => "Speichertemperatur",
        (De, FlowTemperature) => "Vorlauftemperatur",
        (De, FlowRate) => "Durchfluss",
        (De, ErrorCode) => "Fehlerstatus",
        (De, Power) => "Leistung",

        (En, ManualOperation) => "Manual Operation",
        (En, BurnerContact) => "Burner Contact",
        (En, PumpSpeed) => "Circulation Pump",
        (En, BoosterPump) => "Booster Pump",
        (En, CollectorTemperature) => "Collector Temperature",
        (En, ReturnTemperature) => "Return Temperature",
        (En, StorageTemperature) => "Storage Temperature",
        (En, FlowTemperature) => "Flow Temperature",
        (En, FlowRate) => "Flow Rate",
        (En, ErrorCode) => "Error Status",
        (En, Power) => "Power",

        (Fr, ManualOperation) => "Fonctionnement manuel",
        (Fr, BurnerContact) => "Contact brûleur",
        (Fr, PumpSpeed) => "Pompe de circulation",
        (Fr, BoosterPump) => "Pompe de suralimentation",
        (Fr, CollectorTemperature) => "Température du collecteur",
        (Fr, ReturnTemperature) => "Température de retour",
        (Fr, StorageTemperature) => "Température de stockage",
        (Fr, FlowTemperature) => "Température de départ",
        (Fr, FlowRate) => "Débit",
        (Fr, ErrorCode) => "État d'erreur",
        (Fr, Power) => "Puissance",

        (It, ManualOperation) => "Funzionamento manuale",
        (It, BurnerContact) => "Contatto bruciatore",
        (It, PumpSpeed) => "Pompa di circolazione",
        (It, BoosterPump) => "Pompa di potenziamento",
        (It, CollectorTemperature) => "Temperatura collettore",
        (It, ReturnTemperature) => "Temperatura di ritorno",
        (It, StorageTemperature) => "Temperatura di accumulo",
        (It, FlowTemperature) => "Temperatura di mandata",
        (It, FlowRate) => "Portata",
        (It, ErrorCode) => "Stato errore",
        (It, Power) => "Potenza",

        (Es, ManualOperation) => "Funcionamiento manual",
        (Es, BurnerContact) => "Contacto del quemador",
        (Es, PumpSpeed) => "Bomba de circulación",
        (Es, BoosterPump) => "Bomba de refuerzo",
        (Es, CollectorTemperature) => "Temperatura del colector",
        (Es, ReturnTemperature) => "Temperatura de retorno",
        (Es, StorageTemperature) => "Temperatura de almacenamiento",
        (Es, FlowTemperature) => "Temperatura de ida",
        (Es, FlowRate) => "Caudal",
        (Es, ErrorCode) => "Estado de error",
        (Es, Power) => "Potencia",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_table_in_wire_order() {
        for (i, sensor) in SENSORS.iter().enumerate() {
            assert_eq!(sensor.field.index(), i);
        }
    }

    #[test]
    fn test_key_lookup() {
        assert_eq!(Field::from_key("solaris_tk").unwrap(), Field::CollectorTemperature);
        assert_eq!(Field::Power.key(), "solaris_pwr");
        assert!(Field::from_key("solaris_xx").is_err());
    }

    #[test]
    fn test_kinds_and_units() {
        assert_eq!(Field::ManualOperation.sensor().kind, SensorKind::Binary);
        assert_eq!(Field::ErrorCode.sensor().kind, SensorKind::Text);
        assert_eq!(Field::Power.sensor().unit, Some("kW"));
        assert_eq!(Field::Power.sensor().accuracy, 2);
        assert_eq!(Field::FlowRate.sensor().accuracy, 1);
    }

    #[test]
    fn test_display_names() {
        let sensor = Field::CollectorTemperature.sensor();
        assert_eq!(sensor.display_name(Language::De), "Kollektortemperatur");
        assert_eq!(sensor.display_name(Language::En), "Collector Temperature");
        assert_eq!(display_name(Field::FlowRate, Language::Es), "Caudal");
    }
}
