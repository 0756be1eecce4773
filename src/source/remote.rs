use std::time::Duration;

use crate::source::csv_file::delimiter_for;
use crate::source::{
    DrillRecord, RecordProvider, SourceError, VocabRecord, parse_drill_pool, parse_vocabulary,
};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetches the delimited files over HTTP (published spreadsheets, raw gists).
pub struct RemoteProvider {
    vocabulary_url: String,
    drill_pool_url: String,
}

impl RemoteProvider {
    pub fn new(vocabulary_url: &str, drill_pool_url: &str) -> Self {
        Self {
            vocabulary_url: vocabulary_url.to_string(),
            drill_pool_url: drill_pool_url.to_string(),
        }
    }

    fn fetch(url: &str) -> Result<Vec<u8>, SourceError> {
        let network = |reason: String| SourceError::Network {
            origin: url.to_string(),
            reason,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| network(e.to_string()))?;
        let response = client.get(url).send().map_err(|e| network(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                origin: url.to_string(),
            });
        }
        let response = response
            .error_for_status()
            .map_err(|e| network(e.to_string()))?;
        let bytes = response.bytes().map_err(|e| network(e.to_string()))?;
        log::debug!("fetched {} bytes from {url}", bytes.len());
        Ok(bytes.to_vec())
    }

    fn delimiter(url: &str) -> u8 {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        delimiter_for(std::path::Path::new(path))
    }
}

impl RecordProvider for RemoteProvider {
    fn describe(&self) -> String {
        self.vocabulary_url.clone()
    }

    fn load_vocabulary(&self) -> Result<Vec<VocabRecord>, SourceError> {
        let data = Self::fetch(&self.vocabulary_url)?;
        parse_vocabulary(
            data.as_slice(),
            Self::delimiter(&self.vocabulary_url),
            &self.vocabulary_url,
        )
    }

    fn load_numeric_drill_pool(&self) -> Result<Vec<DrillRecord>, SourceError> {
        let data = Self::fetch(&self.drill_pool_url)?;
        parse_drill_pool(
            data.as_slice(),
            Self::delimiter(&self.drill_pool_url),
            &self.drill_pool_url,
        )
    }
}
