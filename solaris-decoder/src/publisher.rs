//! Publishing decoded records to host sinks
//!
//! Each field has at most one sink. Fields without a sink are skipped.

use crate::error_codes::{ErrorCodeTable, Language};
use crate::types::{Field, ParsedRecord, SensorValue, TOTAL_FIELDS};

/// Consumer of one field's decoded values
pub trait Sink {
    fn publish_state(&mut self, value: SensorValue<'_>);
}

impl<F> Sink for F
where
    F: FnMut(SensorValue<'_>),
{
    fn publish_state(&mut self, value: SensorValue<'_>) {
        (self)(value)
    }
}

/// Optional sink per field, registered at construction time
#[derive(Default)]
pub struct SensorSinks {
    sinks: [Option<Box<dyn Sink>>; TOTAL_FIELDS],
}

impl SensorSinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: register the sink for a field, replacing any previous one
    pub fn with_sink(mut self, field: Field, sink: impl Sink + 'static) -> Self {
        self.set(field, Box::new(sink));
        self
    }

    pub fn set(&mut self, field: Field, sink: Box<dyn Sink>) {
        self.sinks[field.index()] = Some(sink);
    }

    pub fn is_registered(&self, field: Field) -> bool {
        self.sinks[field.index()].is_some()
    }

    /// Fields that currently have a sink
    pub fn registered(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| self.is_registered(*f))
    }

    fn get_mut(&mut self, field: Field) -> Option<&mut (dyn Sink + 'static)> {
        self.sinks[field.index()].as_deref_mut()
    }
}

impl std::fmt::Debug for SensorSinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.registered()).finish()
    }
}

/// Maps decoded records onto typed sink values
#[derive(Debug)]
pub struct Publisher {
    sinks: SensorSinks,
    error_codes: ErrorCodeTable,
}

impl Publisher {
    pub fn new(sinks: SensorSinks, language: Language) -> Self {
        Self {
            sinks,
            error_codes: ErrorCodeTable::new(language),
        }
    }

    pub fn sinks(&self) -> &SensorSinks {
        &self.sinks
    }

    /// Publish every field of a record to its sink, if any
    ///
    /// Flags become booleans, power is published in kW, and the error code
    /// is published as its description.
    pub fn publish(&mut self, record: &ParsedRecord) {
        for field in Field::ALL {
            let Some(sink) = self.sinks.get_mut(field) else {
                continue;
            };

            match field {
                Field::ManualOperation | Field::BurnerContact | Field::BoosterPump => {
                    sink.publish_state(SensorValue::Binary(record.int(field) != 0));
                }
                Field::PumpSpeed
                | Field::CollectorTemperature
                | Field::ReturnTemperature
                | Field::StorageTemperature
                | Field::FlowTemperature => {
                    sink.publish_state(SensorValue::Integer(record.int(field)));
                }
                Field::FlowRate => {
                    sink.publish_state(SensorValue::Float(record.flow_rate()));
                }
                Field::Power => {
                    sink.publish_state(SensorValue::Float(record.power_kw()));
                }
                Field::ErrorCode => {
                    let text = self.error_codes.describe(record.error_code());
                    sink.publish_state(SensorValue::Text(text));
                }
            }
        }
    }
}
