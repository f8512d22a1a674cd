//! Localized labels and the text lines built from them.

use std::str::FromStr;

use thiserror::Error;

use crate::models::{NoteSection, PatientInfo};

/// Label language for exports and summary lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Spanish labels (`Sexo`, `Edad`, `Sección`, ...)
    #[default]
    Spanish,
    English,
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown locale: {0}")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let language = lower.split(['-', '_']).next().unwrap_or_default();
        match language {
            "es" | "spanish" => Ok(Locale::Spanish),
            "en" | "english" => Ok(Locale::English),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::Spanish => &SPANISH,
            Locale::English => &ENGLISH,
        }
    }
}

/// Static label set for one locale.
#[derive(Debug)]
pub struct Labels {
    pub sex: &'static str,
    pub age: &'static str,
    pub weight: &'static str,
    pub height: &'static str,
    pub bmi: &'static str,
    pub blood_pressure: &'static str,
    pub heart_rate: &'static str,
    pub respiratory_rate: &'static str,
    pub temperature: &'static str,
    pub oxygen_saturation: &'static str,
    pub section_header: &'static str,
    pub content_header: &'static str,
    /// Row labels, indexed by [`NoteSection::index`]
    pub sections: [&'static str; 9],
}

static SPANISH: Labels = Labels {
    sex: "Sexo",
    age: "Edad",
    weight: "Peso",
    height: "Talla",
    bmi: "IMC",
    blood_pressure: "PA",
    heart_rate: "FC",
    respiratory_rate: "FR",
    temperature: "Temp",
    oxygen_saturation: "SpO₂",
    section_header: "Sección",
    content_header: "Contenido",
    sections: [
        "Subjetivo",
        "Objetivo",
        "Análisis",
        "Plan",
        "Laboratorios",
        "Imágenes",
        "Referencias",
        "Resultados",
        "Medicamentos",
    ],
};

static ENGLISH: Labels = Labels {
    sex: "Sex",
    age: "Age",
    weight: "Weight",
    height: "Height",
    bmi: "BMI",
    blood_pressure: "BP",
    heart_rate: "HR",
    respiratory_rate: "RR",
    temperature: "Temp",
    oxygen_saturation: "SpO₂",
    section_header: "Section",
    content_header: "Content",
    sections: [
        "Subjective",
        "Objective",
        "Analysis",
        "Plan",
        "Labs",
        "Imaging",
        "Referrals",
        "Results",
        "Medications",
    ],
};

impl Labels {
    pub fn section(&self, section: NoteSection) -> &'static str {
        self.sections[section.index()]
    }

    /// `label: value` pairs for the demographics group, units appended.
    fn demographics(&self, info: &PatientInfo) -> [String; 5] {
        [
            format!("{}: {}", self.sex, info.sex),
            format!("{}: {}", self.age, info.age),
            format!("{}: {}kg", self.weight, info.weight),
            format!("{}: {}cm", self.height, info.height),
            format!("{}: {}", self.bmi, info.bmi),
        ]
    }

    fn vitals(&self, info: &PatientInfo) -> [String; 5] {
        [
            format!("{}: {}", self.blood_pressure, info.blood_pressure),
            format!("{}: {}", self.heart_rate, info.heart_rate),
            format!("{}: {}", self.respiratory_rate, info.respiratory_rate),
            format!("{}: {}°C", self.temperature, info.temperature),
            format!("{}: {}%", self.oxygen_saturation, info.oxygen_saturation),
        ]
    }

    /// Second header line of an exported note.
    pub fn demographics_line(&self, info: &PatientInfo) -> String {
        self.demographics(info).join("  ")
    }

    /// Third header line of an exported note.
    pub fn vitals_line(&self, info: &PatientInfo) -> String {
        self.vitals(info).join("  ")
    }

    /// One-line display of all ten measurements, pipe separated.
    pub fn summary_line(&self, info: &PatientInfo) -> String {
        let mut parts = self.demographics(info).to_vec();
        parts.extend(self.vitals(info));
        parts.join(" | ")
    }
}

/// Title of an exported note. Not localized.
pub fn note_title(info: &PatientInfo) -> String {
    format!("Nota - {}", info.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> PatientInfo {
        PatientInfo {
            name: "Ana Pérez".into(),
            sex: "F".into(),
            age: "34".into(),
            weight: "60".into(),
            height: "165".into(),
            bmi: "22".into(),
            blood_pressure: "120/80".into(),
            heart_rate: "72".into(),
            respiratory_rate: "16".into(),
            temperature: "36.8".into(),
            oxygen_saturation: "98".into(),
        }
    }

    #[test]
    fn test_spanish_header_lines() {
        let labels = Locale::Spanish.labels();
        let info = sample_info();

        assert_eq!(note_title(&info), "Nota - Ana Pérez");
        assert_eq!(
            labels.demographics_line(&info),
            "Sexo: F  Edad: 34  Peso: 60kg  Talla: 165cm  IMC: 22"
        );
        assert_eq!(
            labels.vitals_line(&info),
            "PA: 120/80  FC: 72  FR: 16  Temp: 36.8°C  SpO₂: 98%"
        );
    }

    #[test]
    fn test_blank_values_keep_units() {
        let labels = Locale::Spanish.labels();
        let info = PatientInfo::named("Ana");

        assert_eq!(
            labels.demographics_line(&info),
            "Sexo:   Edad:   Peso: kg  Talla: cm  IMC: "
        );
        assert_eq!(labels.vitals_line(&info), "PA:   FC:   FR:   Temp: °C  SpO₂: %");
    }

    #[test]
    fn test_summary_line() {
        let labels = Locale::English.labels();
        assert_eq!(
            labels.summary_line(&sample_info()),
            "Sex: F | Age: 34 | Weight: 60kg | Height: 165cm | BMI: 22 | \
             BP: 120/80 | HR: 72 | RR: 16 | Temp: 36.8°C | SpO₂: 98%"
        );
    }

    #[test]
    fn test_section_labels() {
        let es = Locale::Spanish.labels();
        let en = Locale::English.labels();
        assert_eq!(es.section(NoteSection::Analysis), "Análisis");
        assert_eq!(es.section(NoteSection::Imaging), "Imágenes");
        assert_eq!(en.section(NoteSection::Referrals), "Referrals");
        assert_eq!((es.section_header, es.content_header), ("Sección", "Contenido"));
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("es".parse::<Locale>(), Ok(Locale::Spanish));
        assert_eq!("es-DO".parse::<Locale>(), Ok(Locale::Spanish));
        assert_eq!(" EN_us ".parse::<Locale>(), Ok(Locale::English));
        assert_eq!("fr".parse::<Locale>(), Err(UnknownLocale("fr".into())));
    }
}
