use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EmoCauseError;

/// Policies that are applied when a span is linearized.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizationConfig {
    /// Replace words by their lemmas. Possessive pronouns keep their
    /// surface form.
    pub lemmatize: bool,

    /// Replace pronouns by the representative mention of their
    /// coreference chain.
    pub substitute_coref: bool,

    /// Replace numbers by a placeholder and mark persons, locations and
    /// organizations with a `/CLASS` suffix.
    pub substitute_ner: bool,

    /// Add prepositional objects to dependency-based renderings.
    pub include_prepositional_objects: bool,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        NormalizationConfig {
            lemmatize: true,
            substitute_coref: true,
            substitute_ner: true,
            include_prepositional_objects: true,
        }
    }
}

/// Height window of holder and cause searches.
///
/// Height 1 is the pre-terminal of the trigger, so `min_height` must
/// be at least 2.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub min_height: usize,
    pub max_height: usize,
}

impl SearchConfig {
    pub fn heights(&self) -> RangeInclusive<usize> {
        self.min_height..=self.max_height
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_height: 2,
            max_height: 6,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorefConfig {
    /// The maximum number of tokens of a representative mention that
    /// replaces a pronoun.
    pub max_representative_len: usize,
}

impl Default for CorefConfig {
    fn default() -> Self {
        CorefConfig {
            max_representative_len: 4,
        }
    }
}

/// Configuration of the extraction pipeline.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    pub normalization: NormalizationConfig,
    pub search: SearchConfig,
    pub coref: CorefConfig,
}

impl ExtractionConfig {
    /// Check that the configuration values are usable.
    pub fn validate(&self) -> Result<(), EmoCauseError> {
        if self.search.min_height < 2 {
            return Err(EmoCauseError::IllegalConfigurationError(format!(
                "minimum search height must be at least 2, was {}",
                self.search.min_height
            )));
        }

        if self.search.min_height > self.search.max_height {
            return Err(EmoCauseError::IllegalConfigurationError(format!(
                "minimum search height {} exceeds maximum search height {}",
                self.search.min_height, self.search.max_height
            )));
        }

        if self.coref.max_representative_len == 0 {
            return Err(EmoCauseError::IllegalConfigurationError(
                "maximum representative mention length must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Extraction run configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The file with emotion trigger patterns.
    pub patterns: String,

    /// Configuration of the extraction pipeline.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl Config {
    /// Make configuration paths relative to the configuration file.
    pub fn relativize_paths<P>(&mut self, config_path: P) -> Result<(), EmoCauseError>
    where
        P: AsRef<Path>,
    {
        self.patterns = relativize_path(config_path.as_ref(), &self.patterns)?;
        Ok(())
    }
}

pub trait TomlRead
where
    Self: Sized,
{
    fn from_toml_read(read: impl Read) -> Result<Self, EmoCauseError>;
}

impl TomlRead for Config {
    fn from_toml_read(mut read: impl Read) -> Result<Self, EmoCauseError> {
        let mut data = String::new();
        read.read_to_string(&mut data)?;
        let config: Config = toml::from_str(&data)?;
        config.extraction.validate()?;
        Ok(config)
    }
}

fn relativize_path(config_path: &Path, filename: &str) -> Result<String, EmoCauseError> {
    if filename.is_empty() {
        return Ok(filename.to_owned());
    }

    let path = Path::new(&filename);

    // Don't touch absolute paths.
    if path.is_absolute() {
        return Ok(filename.to_owned());
    }

    let abs_config_path = config_path.canonicalize()?;
    Ok(abs_config_path
        .parent()
        .ok_or_else(|| {
            EmoCauseError::RelativizePathError(format!(
                "Cannot get parent path of the configuration file: {}",
                abs_config_path.to_string_lossy()
            ))
        })?
        .join(path)
        .to_str()
        .ok_or_else(|| {
            EmoCauseError::RelativizePathError(format!(
                "Cannot convert parent path to string: {}",
                abs_config_path.to_string_lossy()
            ))
        })?
        .to_owned())
}
