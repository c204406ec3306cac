//! Controller error codes and their localized descriptions
//!
//! The controller reports at most one error as a single character in the ERR
//! field. Each language table ends with a reserved "unknown" entry whose
//! description is used as the base label for codes not listed in the table.

use crate::types::NO_ERROR;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Display language for error descriptions and sensor names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    #[default]
    En,
    Fr,
    It,
    Es,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::De,
        Language::En,
        Language::Fr,
        Language::It,
        Language::Es,
    ];

    /// ISO 639-1 code
    pub fn code(self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Fr => "fr",
            Language::It => "it",
            Language::Es => "es",
        }
    }

    /// Parse a language code, falling back to the default language if unknown
    pub fn from_code_or_default(code: &str) -> Language {
        code.parse().unwrap_or_else(|_| {
            log::warn!(
                "Unknown language '{}', using '{}'",
                code,
                Language::default().code()
            );
            Language::default()
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unsupported language: {}", s))
    }
}

/// One row of an error code table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCodeEntry {
    /// Single character code, [`NO_ERROR`] for "no error"
    pub code: char,
    pub description: &'static str,
}

const fn entry(code: char, description: &'static str) -> ErrorCodeEntry {
    ErrorCodeEntry { code, description }
}

// The last row of every table is the "unknown" template; its code is never matched.

static ERROR_CODES_DE: [ErrorCodeEntry; 10] = [
    entry(NO_ERROR, "Kein Fehler"),
    entry('K', "Kollektortemperatursensor"),
    entry('R', "Rücklauftemperatursensor"),
    entry('S', "Speichertemperatursensor"),
    entry('D', "Durchflusssensor"),
    entry('V', "Vorlauftemperatursensor"),
    entry('G', "A/D-Wandler-Fehler / Versorgungsspannungsfehler / Referenzspannungsfehler"),
    entry(
        'F',
        "Minimaldurchfluss V1 wurde in der Startphase nach Ablauf der \"Zeit P2\" nicht erreicht",
    ),
    entry(
        'W',
        "Minimaldurchfluss V1 wurde in der Startphase nach Ablauf der \"Zeit P2\" nicht erreicht",
    ),
    entry(NO_ERROR, "Unbekannter Fehler"),
];

static ERROR_CODES_EN: [ErrorCodeEntry; 10] = [
    entry(NO_ERROR, "No error"),
    entry('K', "Collector Temperature Sensor"),
    entry('R', "Return Temperature Sensor"),
    entry('S', "Storage Temperature Sensor"),
    entry('D', "Flow Rate Sensor"),
    entry('V', "Flow Temperature Sensor"),
    entry('G', "A/D Converter Error / Supply Voltage Error / Reference Voltage Error"),
    entry('F', "Minimum Flow V1 not reached during startup after 'Time P2' elapsed"),
    entry('W', "Minimum Flow V1 not reached during startup after 'Time P2' elapsed"),
    entry(NO_ERROR, "Unknown error"),
];

static ERROR_CODES_FR: [ErrorCodeEntry; 10] = [
    entry(NO_ERROR, "Pas d'erreur"),
    entry('K', "Capteur de température du collecteur"),
    entry('R', "Capteur de température de retour"),
    entry('S', "Capteur de température de stockage"),
    entry('D', "Capteur de débit"),
    entry('V', "Capteur de température de départ"),
    entry(
        'G',
        "Erreur du convertisseur A/D / Erreur de tension d'alimentation / \
         Erreur de tension de référence",
    ),
    entry('F', "Débit minimum V1 non atteint au démarrage après l'expiration du 'Temps P2'"),
    entry('W', "Débit minimum V1 non atteint au démarrage après l'expiration du 'Temps P2'"),
    entry(NO_ERROR, "Erreur inconnue"),
];

static ERROR_CODES_IT: [ErrorCodeEntry; 10] = [
    entry(NO_ERROR, "Nessun errore"),
    entry('K', "Sensore temperatura collettore"),
    entry('R', "Sensore temperatura ritorno"),
    entry('S', "Sensore temperatura accumulo"),
    entry('D', "Sensore portata"),
    entry('V', "Sensore temperatura mandata"),
    entry(
        'G',
        "Errore convertitore A/D / Errore tensione di alimentazione / \
         Errore tensione di riferimento",
    ),
    entry('F', "Portata minima V1 non raggiunta durante l'avvio dopo il tempo 'P2' trascorso"),
    entry('W', "Portata minima V1 non raggiunta durante l'avvio dopo il tempo 'P2' trascorso"),
    entry(NO_ERROR, "Errore sconosciuto"),
];

static ERROR_CODES_ES: [ErrorCodeEntry; 10] = [
    entry(NO_ERROR, "Sin error"),
    entry('K', "Sensor de temperatura del colector"),
    entry('R', "Sensor de temperatura de retorno"),
    entry('S', "Sensor de temperatura de almacenamiento"),
    entry('D', "Sensor de caudal"),
    entry('V', "Sensor de temperatura de ida"),
    entry(
        'G',
        "Error del convertidor A/D / Error de tensión de alimentación / \
         Error de tensión de referencia",
    ),
    entry(
        'F',
        "Caudal mínimo V1 no alcanzado durante el arranque tras el transcurso del 'Tiempo P2'",
    ),
    entry(
        'W',
        "Caudal mínimo V1 no alcanzado durante el arranque tras el transcurso del 'Tiempo P2'",
    ),
    entry(NO_ERROR, "Error desconocido"),
];

/// Static error code table for a language (last entry is the unknown template)
pub fn error_codes(language: Language) -> &'static [ErrorCodeEntry] {
    match language {
        Language::De => &ERROR_CODES_DE,
        Language::En => &ERROR_CODES_EN,
        Language::Fr => &ERROR_CODES_FR,
        Language::It => &ERROR_CODES_IT,
        Language::Es => &ERROR_CODES_ES,
    }
}

/// Error code lookup with a reusable buffer for fallback descriptions
#[derive(Debug, Clone)]
pub struct ErrorCodeTable {
    entries: &'static [ErrorCodeEntry],
    fallback: String,
}

impl ErrorCodeTable {
    pub fn new(language: Language) -> Self {
        Self {
            entries: error_codes(language),
            fallback: String::with_capacity(256),
        }
    }

    /// Known entries, without the unknown template
    pub fn known(&self) -> &'static [ErrorCodeEntry] {
        &self.entries[..self.entries.len() - 1]
    }

    /// Base label used for codes missing from the table
    pub fn unknown_label(&self) -> &'static str {
        self.entries[self.entries.len() - 1].description
    }

    /// Describe an error code
    ///
    /// Always returns printable text. Any code other than [`NO_ERROR`] is
    /// logged at error level; codes missing from the table are described as
    /// `"<unknown label> ('<code>')"`.
    pub fn describe(&mut self, code: char) -> &str {
        let entries = self.entries;
        if let Some(found) = entries[..entries.len() - 1].iter().find(|e| e.code == code) {
            if code != NO_ERROR {
                log::error!(
                    "Solaris Error: Code {}; Description: {}",
                    code,
                    found.description
                );
            }
            return found.description;
        }

        let label = self.unknown_label();
        self.fallback.clear();
        // Writing into a String cannot fail
        let _ = write!(self.fallback, "{} ('{}')", label, code);
        log::error!("Unknown error code: {}", code);
        &self.fallback
    }
}

impl Default for ErrorCodeTable {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_error_description() {
        let mut table = ErrorCodeTable::new(Language::En);
        assert_eq!(table.describe(NO_ERROR), "No error");

        let mut table = ErrorCodeTable::new(Language::De);
        assert_eq!(table.describe(NO_ERROR), "Kein Fehler");
    }

    #[test]
    fn test_known_codes() {
        let mut table = ErrorCodeTable::new(Language::En);
        assert_eq!(table.describe('K'), "Collector Temperature Sensor");
        assert_eq!(table.describe('D'), "Flow Rate Sensor");
        let expected = table.known()[7].description;
        assert_eq!(table.describe('F'), expected);
    }

    #[test]
    fn test_unknown_code_fallback() {
        let mut table = ErrorCodeTable::new(Language::En);
        assert_eq!(table.describe('X'), "Unknown error ('X')");
        // Buffer is reused, not appended to
        assert_eq!(table.describe('Q'), "Unknown error ('Q')");

        let mut table = ErrorCodeTable::new(Language::Fr);
        assert_eq!(table.describe('z'), "Erreur inconnue ('z')");
    }

    #[test]
    fn test_tables_have_same_codes() {
        let reference: Vec<char> = error_codes(Language::En).iter().map(|e| e.code).collect();
        for lang in Language::ALL {
            let codes: Vec<char> = error_codes(lang).iter().map(|e| e.code).collect();
            assert_eq!(codes, reference, "table for {}", lang);
        }
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("de".parse::<Language>(), Ok(Language::De));
        assert_eq!(" IT ".parse::<Language>(), Ok(Language::It));
        assert!("pl".parse::<Language>().is_err());
        assert_eq!(Language::from_code_or_default("pl"), Language::En);
    }
}
