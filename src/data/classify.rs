use std::collections::BTreeMap;

use crate::config::ClassifyRule;

use super::model::SourceFile;

// ---------------------------------------------------------------------------
// Filename classifier
// ---------------------------------------------------------------------------

/// The result of partitioning the opened files: SLA files (all of them, in
/// open order) and at most one driver file per category.
#[derive(Debug, Default)]
pub struct Classified<'a> {
    pub sla: Vec<&'a SourceFile>,
    /// category name → the first file whose name matched that category.
    pub drivers: BTreeMap<String, &'a SourceFile>,
}

/// Partition files by filename substring rules, first matching rule wins,
/// SLA as the fallback for files no rule matches.
///
/// Only the first driver file per category is kept; later matches for the
/// same category are silently ignored.
pub fn classify<'a>(files: &'a [SourceFile], rules: &[ClassifyRule]) -> Classified<'a> {
    let mut out = Classified::default();

    for file in files {
        match rules.iter().find(|r| file.name.contains(&r.pattern)) {
            Some(rule) => {
                out.drivers.entry(rule.category.clone()).or_insert(file);
            }
            None => out.sla.push(file),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    fn file(name: &str) -> SourceFile {
        SourceFile::new(name, Vec::new())
    }

    #[test]
    fn default_rules_partition_by_substring() {
        let files = vec![
            file("sla_march.xlsx"),
            file("FNB_CARD_DRIVERS.xlsx"),
            file("sla_april.xlsx"),
            file("GROUP_CRIME_DRIVERS.xlsx"),
        ];
        let config = DashboardConfig::default();
        let classified = classify(&files, &config.rules);

        assert_eq!(classified.sla.len(), 2);
        assert_eq!(classified.sla[0].name, "sla_march.xlsx");
        assert_eq!(classified.sla[1].name, "sla_april.xlsx");
        assert_eq!(
            classified.drivers.get("card_drivers").map(|f| f.name.as_str()),
            Some("FNB_CARD_DRIVERS.xlsx")
        );
        assert_eq!(
            classified.drivers.get("group_crime").map(|f| f.name.as_str()),
            Some("GROUP_CRIME_DRIVERS.xlsx")
        );
    }

    #[test]
    fn duplicate_driver_files_keep_first_by_open_order() {
        let files = vec![
            file("FNB_CARD_DRIVERS_v2.xlsx"),
            file("FNB_CARD_DRIVERS_v1.xlsx"),
        ];
        let config = DashboardConfig::default();
        let classified = classify(&files, &config.rules);

        assert!(classified.sla.is_empty());
        assert_eq!(classified.drivers.len(), 1);
        assert_eq!(
            classified.drivers.get("card_drivers").map(|f| f.name.as_str()),
            Some("FNB_CARD_DRIVERS_v2.xlsx")
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = vec![
            ClassifyRule {
                pattern: "DRIVERS".into(),
                category: "generic".into(),
            },
            ClassifyRule {
                pattern: "FNB_CARD_DRIVERS".into(),
                category: "card_drivers".into(),
            },
        ];
        let files = vec![file("FNB_CARD_DRIVERS.xlsx")];
        let classified = classify(&files, &rules);

        assert!(classified.drivers.contains_key("generic"));
        assert!(!classified.drivers.contains_key("card_drivers"));
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let config = DashboardConfig::default();
        let classified = classify(&[], &config.rules);
        assert!(classified.sla.is_empty());
        assert!(classified.drivers.is_empty());
    }
}
