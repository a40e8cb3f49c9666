use std::fmt;

use clap::ValueEnum;
use serde::{Serialize, Serializer};

/// Suffixes of the reference panel files the service holds for each population
static REFERENCE_SUFFIXES: [&str; 4] = ["bed", "bim", "fam", "synonyms"];

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MagmaType {
    Default,
    Enhanced
}

/// 1000 Genomes reference panels (GRCh37)
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SnpPopulation {
    #[value(name = "g1000_eur")]
    Eur,
    #[value(name = "g1000_afr")]
    Afr,
    #[value(name = "g1000_eas")]
    Eas,
    #[value(name = "g1000_sas")]
    Sas,
    #[value(name = "g1000_amr")]
    Amr
}

impl SnpPopulation {
    /// Server-side file names of the linkage disequilibrium reference panel, e.g. g1000_eur.bim
    pub fn reference_data_files(&self) -> Vec<String> {
        REFERENCE_SUFFIXES
            .iter()
            .map(|suffix| format!("{self}.{suffix}"))
            .collect()
    }
}

/// The CLI value name doubles as the name sent to the service
fn write_value_name<T: ValueEnum>(value: &T, f: &mut fmt::Formatter) -> fmt::Result {
    match value.to_possible_value() {
        Some(possible) => f.write_str(possible.get_name()),
        None => Err(fmt::Error)
    }
}

impl fmt::Display for MagmaType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_value_name(self, f)
    }
}

impl fmt::Display for SnpPopulation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_value_name(self, f)
    }
}

impl Serialize for MagmaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for SnpPopulation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
