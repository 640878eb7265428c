use std::io::Read;
use std::path::Path;
use log::{debug, info, warn};

use super::{DrugMatch, KnowledgeBase, KnowledgeEffectRecord};
use crate::error::{AdrError, AdrResult};
use crate::matching;

// Knowledge base loaded once from a CSV file with the columns
// `Drug_Name,Side_Effect,Frequency,Severity,Risk_Factors`.
#[derive(Debug, Clone)]
pub struct CsvKnowledgeBase {
    // Unique names in first-seen order; matching walks this order.
    drugs: Vec<String>,
    records: Vec<KnowledgeEffectRecord>,
}

impl CsvKnowledgeBase {
    pub fn from_path<P: AsRef<Path>>(path: P) -> AdrResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let kb = Self::from_reader(file)?;
        info!(
            "Loaded knowledge base from {:?}: {} records, {} drugs",
            path,
            kb.records.len(),
            kb.drugs.len()
        );
        Ok(kb)
    }

    pub fn from_reader<R: Read>(reader: R) -> AdrResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut drugs: Vec<String> = Vec::new();
        let mut records = Vec::new();

        for (line, row) in csv_reader.deserialize::<KnowledgeEffectRecord>().enumerate() {
            let record = row?;
            if record.drug_name.is_empty() || record.side_effect.is_empty() {
                warn!("Skipping knowledge base row {}: missing drug or effect name", line + 2);
                continue;
            }
            if !drugs.contains(&record.drug_name) {
                drugs.push(record.drug_name.clone());
            }
            records.push(record);
        }

        if records.is_empty() {
            return Err(AdrError::KnowledgeBase(
                "Knowledge base contains no usable records".to_string()
            ));
        }

        Ok(Self { drugs, records })
    }

    // Resolve a free-text drug name: exact (case-insensitive), then
    // containment in either direction, then any shared word.
    fn resolve(&self, query: &str) -> Option<&str> {
        let wanted = matching::normalize(query);
        if wanted.is_empty() {
            return None;
        }

        self.drugs.iter()
            .find(|d| matching::normalize(d) == wanted)
            .or_else(|| self.drugs.iter().find(|d| matching::names_match(&wanted, d)))
            .or_else(|| self.drugs.iter().find(|d| matching::word_overlap(&wanted, d)))
            .map(String::as_str)
    }
}

impl KnowledgeBase for CsvKnowledgeBase {
    fn query(&self, drug_name: &str) -> DrugMatch {
        let Some(matched) = self.resolve(drug_name) else {
            debug!("No knowledge base match for '{}'", drug_name);
            return DrugMatch::not_found();
        };

        let records: Vec<KnowledgeEffectRecord> = self.records.iter()
            .filter(|r| r.drug_name == matched)
            .cloned()
            .collect();

        debug!("'{}' matched '{}' ({} records)", drug_name, matched, records.len());
        DrugMatch {
            matched_name: Some(matched.to_string()),
            records,
        }
    }

    fn drug_names(&self) -> Vec<String> {
        let mut names = self.drugs.clone();
        names.sort();
        names
    }
}
