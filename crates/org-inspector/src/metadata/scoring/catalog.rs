use super::super::entity::{Entity, PropertyError};
use super::super::variant::EntityVariant;
use super::rules::builtin_rules;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Predicate of a rule. Plain function pointers keep rules free of captured state.
pub type RuleFormula = fn(&Entity) -> Result<bool, PropertyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Dependency,
    Documentation,
    Useless,
    Security,
    BadCode,
    ApiVersion,
    UserAdoption,
    HardCodedUrl,
    HardCodedId,
    Overuse,
}

impl RuleCategory {
    pub const ALL: [Self; 10] = [
        Self::Dependency,
        Self::Documentation,
        Self::Useless,
        Self::Security,
        Self::BadCode,
        Self::ApiVersion,
        Self::UserAdoption,
        Self::HardCodedUrl,
        Self::HardCodedId,
        Self::Overuse,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dependency => "Dependency",
            Self::Documentation => "Documentation",
            Self::Useless => "Useless",
            Self::Security => "Security",
            Self::BadCode => "Bad Code",
            Self::ApiVersion => "API Version",
            Self::UserAdoption => "User Adoption",
            Self::HardCodedUrl => "Hard-coded URL",
            Self::HardCodedId => "Hard-coded ID",
            Self::Overuse => "Overuse",
        }
    }

    /// Snake-case key, as used on the command line and in serialized output.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Dependency => "dependency",
            Self::Documentation => "documentation",
            Self::Useless => "useless",
            Self::Security => "security",
            Self::BadCode => "bad_code",
            Self::ApiVersion => "api_version",
            Self::UserAdoption => "user_adoption",
            Self::HardCodedUrl => "hard_coded_url",
            Self::HardCodedId => "hard_coded_id",
            Self::Overuse => "overuse",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let wanted = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|category| category.key() == wanted)
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable best-practice rule. `id` is permanent: never renumbered, never reused.
#[derive(Clone)]
pub struct ScoreRule {
    pub id: u32,
    pub description: &'static str,
    pub formula: RuleFormula,
    pub error_message: &'static str,
    /// Dotted path used to highlight the offending value; may not be a real property.
    pub bad_field: &'static str,
    pub applicable: &'static [EntityVariant],
    pub category: RuleCategory,
}

impl ScoreRule {
    pub fn applies_to(&self, variant: EntityVariant) -> bool {
        self.applicable.contains(&variant)
    }

    pub fn evaluate(&self, entity: &Entity) -> Result<bool, PropertyError> {
        (self.formula)(entity)
    }
}

impl fmt::Debug for ScoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreRule")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("category", &self.category)
            .field("bad_field", &self.bad_field)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("rule id {0} is declared more than once")]
    DuplicateId(u32),
    #[error("rule {0} applies to no entity variant")]
    NoApplicableVariant(u32),
    #[error("rule {rule_id} applies to {variant}, which does not participate in scoring")]
    VariantWithoutScoring { rule_id: u32, variant: EntityVariant },
}

/// Ordered rule list with an id index. Built once, read-only afterwards.
#[derive(Debug)]
pub struct RuleCatalog {
    rules: Vec<ScoreRule>,
    by_id: HashMap<u32, usize>,
}

static GLOBAL_CATALOG: OnceLock<RuleCatalog> = OnceLock::new();

impl RuleCatalog {
    pub fn new(rules: Vec<ScoreRule>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(rules.len());
        for (index, rule) in rules.iter().enumerate() {
            if rule.applicable.is_empty() {
                return Err(CatalogError::NoApplicableVariant(rule.id));
            }
            if let Some(variant) = rule
                .applicable
                .iter()
                .copied()
                .find(|variant| !variant.has_scoring())
            {
                return Err(CatalogError::VariantWithoutScoring {
                    rule_id: rule.id,
                    variant,
                });
            }
            if by_id.insert(rule.id, index).is_some() {
                return Err(CatalogError::DuplicateId(rule.id));
            }
        }
        Ok(Self { rules, by_id })
    }

    /// Validates the built-in rules and installs them as the process-wide
    /// catalog. Call at startup so a broken rule table fails before any work.
    pub fn builtin() -> Result<&'static Self, CatalogError> {
        if let Some(catalog) = GLOBAL_CATALOG.get() {
            return Ok(catalog);
        }
        let catalog = Self::new(builtin_rules())?;
        Ok(GLOBAL_CATALOG.get_or_init(|| catalog))
    }

    /// Process-wide built-in catalog, validated on first access.
    pub fn global() -> &'static Self {
        GLOBAL_CATALOG.get_or_init(|| match Self::new(builtin_rules()) {
            Ok(catalog) => catalog,
            Err(err) => panic!("built-in score rule catalog is invalid: {err}"),
        })
    }

    pub fn rules(&self) -> &[ScoreRule] {
        &self.rules
    }

    pub fn rule(&self, id: u32) -> Option<&ScoreRule> {
        self.by_id.get(&id).map(|index| &self.rules[*index])
    }

    pub fn by_category(&self, category: RuleCategory) -> Vec<&ScoreRule> {
        self.rules
            .iter()
            .filter(|rule| rule.category == category)
            .collect()
    }

    pub fn ids_for_category(&self, category: RuleCategory) -> Vec<u32> {
        self.rules
            .iter()
            .filter(|rule| rule.category == category)
            .map(|rule| rule.id)
            .collect()
    }

    /// Rules applicable to `variant`, in catalog order.
    pub fn applicable_to(&self, variant: EntityVariant) -> Vec<&ScoreRule> {
        self.rules
            .iter()
            .filter(|rule| rule.applies_to(variant))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Version number of the first release of 2022 (February).
const BASE_VERSION: u32 = 54;
const BASE_YEAR: i32 = 2022;
const RELEASES_PER_YEAR: u32 = 3;
/// Versions at least this many years behind the current release are too old.
pub const API_VERSION_MAX_AGE_YEARS: u32 = 3;

/// Platform release live on `date`: releases ship in February, June and October.
pub fn platform_version_on(date: NaiveDate) -> u32 {
    let years = (date.year() - BASE_YEAR).max(0) as u32;
    let base = BASE_VERSION + years * RELEASES_PER_YEAR;
    match date.month() {
        1 => base.saturating_sub(1),
        2..=5 => base,
        6..=9 => base + 1,
        _ => base + 2,
    }
}

/// Recomputed on every call since it depends on the wall clock.
pub fn current_platform_version() -> u32 {
    platform_version_on(Utc::now().date_naive())
}

pub fn is_old_api_version(version: f64) -> bool {
    let current = f64::from(current_platform_version());
    current - version >= f64::from(API_VERSION_MAX_AGE_YEARS * RELEASES_PER_YEAR)
}
