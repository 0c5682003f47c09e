use anyhow::{Context, Result};
use cashier_core::{Category, Classifier, SignPolicy};
use cashier_ingest::ColumnMapping;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Optional `--config` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Column names, same shape as a mapping file
    pub columns: Option<ColumnMapping>,
    /// Extra patterns per category name, appended to the built-in ones
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<String>>,
    pub sign_policy: Option<SignPolicy>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(p) = path else {
        return Ok(Config::default());
    };
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let mut cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.columns = cfg
        .columns
        .map(ColumnMapping::checked)
        .transpose()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("[columns] in {}", p.display()))?;
    Ok(cfg)
}

impl Config {
    /// Built-in rules plus any `[rules]` extensions
    pub fn classifier(&self) -> Result<Classifier> {
        let mut classifier = Classifier::default();
        for (name, patterns) in &self.rules {
            let category: Category = name
                .parse()
                .with_context(|| format!("[rules] key '{name}'"))?;
            if category == Category::Unknown {
                log::warn!("[rules] entries for 'unknown' are ignored");
                continue;
            }
            classifier.extend(category, patterns.iter().map(String::as_str));
        }
        Ok(classifier)
    }

    /// `--map-config` wins over `[columns]`, which wins over identity
    pub fn mapping(&self, map_config: Option<&Path>) -> Result<ColumnMapping> {
        match map_config {
            Some(p) => ColumnMapping::from_path(p).context("load column mapping"),
            None => Ok(self.columns.clone().unwrap_or_default()),
        }
    }

    /// `--sign-policy` wins over the config file
    pub fn sign_policy(&self, flag: Option<SignPolicy>) -> SignPolicy {
        flag.or(self.sign_policy).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_default() {
        let cfg = load_config(None).unwrap();
        assert!(cfg.columns.is_none());
        assert_eq!(cfg.sign_policy(None), SignPolicy::ByCategory);
    }

    #[test]
    fn test_rules_extend_classifier() {
        let cfg: Config = toml::from_str(
            r#"
sign_policy = "source"

[rules]
rakeback = ["weekly chest"]
"#,
        )
        .unwrap();
        let classifier = cfg.classifier().unwrap();
        assert_eq!(classifier.classify("Weekly Chest #12"), Category::Rakeback);
        assert_eq!(classifier.classify("Deposit"), Category::Deposit);
        assert_eq!(cfg.sign_policy(None), SignPolicy::Source);
        assert_eq!(cfg.sign_policy(Some(SignPolicy::ByCategory)), SignPolicy::ByCategory);
    }

    #[test]
    fn test_bad_rule_category() {
        let cfg: Config = toml::from_str("[rules]\nrake = [\"x\"]\n").unwrap();
        assert!(cfg.classifier().is_err());
    }

    #[test]
    fn test_columns_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cashier.toml");
        fs::write(
            &path,
            "[columns]\ndate = \"When\"\ntype = \"Kind\"\namount = \"Sum\"\ncurrency = \"Cur\"\n",
        )
        .unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        let mapping = cfg.mapping(None).unwrap();
        assert_eq!(mapping.date, "When");
        assert_eq!(mapping.description, None);
    }

    #[test]
    fn test_blank_description_in_config_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cashier.toml");
        fs::write(
            &path,
            "[columns]\ndate = \"When\"\ntype = \"Kind\"\namount = \"Sum\"\ncurrency = \"Cur\"\ndescription = \"\"\n",
        )
        .unwrap();
        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.columns.as_ref().and_then(|c| c.description.clone()), None);
        assert_eq!(cfg.mapping(None).unwrap().description, None);
    }

    #[test]
    fn test_blank_column_in_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cashier.toml");
        fs::write(
            &path,
            "[columns]\ndate = \" \"\ntype = \"Kind\"\namount = \"Sum\"\ncurrency = \"Cur\"\n",
        )
        .unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
