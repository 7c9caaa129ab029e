/// Exact-match synonym table mapping free-text variants to canonical forms.
///
/// Values that are not a known synonym pass through unchanged, so mapping an
/// already canonical value is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    synonyms: &'static [(&'static str, &'static str)],
}

pub const CATEGORY_VOCABULARY: Vocabulary = Vocabulary::new(&[
    ("land", "Land Access"),
    ("Hiring", "Local Hiring"),
    ("ENV", "Environment"),
    ("noise", "Noise"),
]);

pub const THEME_VOCABULARY: Vocabulary = Vocabulary::new(&[
    ("edu", "Education"),
    ("HEALTH", "Health"),
    ("infra", "Infrastructure"),
]);

impl Vocabulary {
    pub const fn new(synonyms: &'static [(&'static str, &'static str)]) -> Self {
        Self { synonyms }
    }

    pub fn canonicalize<'a>(&self, value: &'a str) -> &'a str {
        self.synonyms
            .iter()
            .find(|(raw, _)| *raw == value)
            .map_or(value, |(_, canonical)| *canonical)
    }

    pub fn is_known_synonym(&self, value: &str) -> bool {
        self.synonyms.iter().any(|(raw, _)| *raw == value)
    }

    /// SQL `CASE` expression applying this mapping to `column`.
    pub fn case_expression(&self, column: &str) -> String {
        let mut expr = String::from("CASE");
        for (raw, canonical) in self.synonyms {
            expr.push_str(&format!(
                " WHEN {} = '{}' THEN '{}'",
                column,
                sql_escape(raw),
                sql_escape(canonical)
            ));
        }
        expr.push_str(&format!(" ELSE {} END", column));
        expr
    }

    /// SQL predicate matching rows whose `column` holds a known synonym.
    pub fn synonym_filter(&self, column: &str) -> String {
        let values = self
            .synonyms
            .iter()
            .map(|(raw, _)| format!("'{}'", sql_escape(raw)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} IN ({})", column, values)
    }
}

fn sql_escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(CATEGORY_VOCABULARY.canonicalize("land"), "Land Access");
        assert_eq!(CATEGORY_VOCABULARY.canonicalize("Hiring"), "Local Hiring");
        assert_eq!(CATEGORY_VOCABULARY.canonicalize("ENV"), "Environment");
        assert_eq!(CATEGORY_VOCABULARY.canonicalize("noise"), "Noise");
        assert_eq!(CATEGORY_VOCABULARY.canonicalize("Water"), "Water");
        // exact match only
        assert_eq!(CATEGORY_VOCABULARY.canonicalize("LAND"), "LAND");
    }

    #[test]
    fn test_mapping_is_idempotent() {
        for raw in ["land", "Hiring", "ENV", "Water", "noise", "Land Access"] {
            let once = CATEGORY_VOCABULARY.canonicalize(raw);
            assert_eq!(CATEGORY_VOCABULARY.canonicalize(once), once);
        }
        for raw in ["edu", "HEALTH", "infra", "livelihood"] {
            let once = THEME_VOCABULARY.canonicalize(raw);
            assert_eq!(THEME_VOCABULARY.canonicalize(once), once);
        }
    }

    #[test]
    fn test_synonym_filter() {
        assert_eq!(
            CATEGORY_VOCABULARY.synonym_filter("Category"),
            "Category IN ('land', 'Hiring', 'ENV', 'noise')"
        );
        assert!(CATEGORY_VOCABULARY.is_known_synonym("ENV"));
        assert!(!CATEGORY_VOCABULARY.is_known_synonym("Environment"));
    }

    #[test]
    fn test_case_expression() {
        assert_eq!(
            THEME_VOCABULARY.case_expression("Theme"),
            "CASE WHEN Theme = 'edu' THEN 'Education' WHEN Theme = 'HEALTH' THEN 'Health' \
             WHEN Theme = 'infra' THEN 'Infrastructure' ELSE Theme END"
        );
    }
}
