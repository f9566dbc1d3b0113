use super::dependency::DependencyView;
use super::variant::{EntityVariant, VariantDescriptor};
use chrono::{DateTime, TimeZone, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Value held in one declared property slot.
#[derive(Debug, Clone)]
pub enum Property {
    Value(Value),
    Ref(EntityRef),
    Refs(Vec<EntityRef>),
}

impl Default for Property {
    fn default() -> Self {
        Self::Value(Value::Null)
    }
}

/// Shared handle to an entity. Joins store these instead of copies, so one
/// entity can be reached from many others and mutated in place.
#[derive(Clone)]
pub struct EntityRef(Arc<RwLock<Entity>>);

impl EntityRef {
    pub fn new(entity: Entity) -> Self {
        Self(Arc::new(RwLock::new(entity)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Entity> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Entity> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identifier of the referenced entity, `None` when it has none or is locked for writing.
    pub fn id(&self) -> Option<String> {
        let guard = self.0.try_read().ok()?;
        guard.id().map(str::to_string)
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read() {
            Ok(entity) => write!(f, "EntityRef({}:{})", entity.variant(), entity.id().unwrap_or("?")),
            Err(_) => f.write_str("EntityRef(<locked>)"),
        }
    }
}

impl Serialize for EntityRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.id() {
            Some(id) => serializer.serialize_str(&id),
            None => serializer.serialize_none(),
        }
    }
}

/// Score state of a scoring-enabled entity. The three members only grow together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    score: u32,
    bad_fields: Vec<String>,
    bad_reason_ids: Vec<u32>,
}

impl ScoreCard {
    pub(crate) fn record(&mut self, rule_id: u32, bad_field: &str) {
        self.score += 1;
        self.bad_fields.push(bad_field.to_string());
        self.bad_reason_ids.push(rule_id);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn bad_fields(&self) -> &[String] {
        &self.bad_fields
    }

    pub fn bad_reason_ids(&self) -> &[u32] {
        &self.bad_reason_ids
    }
}

/// Raised when mutating a property the variant does not declare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityError {
    #[error("{variant} does not declare property '{property}'")]
    UndeclaredProperty {
        variant: EntityVariant,
        property: String,
    },
}

/// Raised by read accessors while a rule formula inspects an entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    #[error("{variant} does not declare property '{property}'")]
    Undeclared {
        variant: EntityVariant,
        property: String,
    },
    #[error("property '{property}' of {variant} is not {expected}")]
    TypeMismatch {
        variant: EntityVariant,
        property: String,
        expected: &'static str,
    },
}

/// Sealed record of one variant: exactly one slot per declared property.
#[derive(Debug, Clone)]
pub struct Entity {
    variant: EntityVariant,
    values: Vec<Property>,
    score: Option<ScoreCard>,
    dependencies: Option<DependencyView>,
}

impl Entity {
    pub(crate) fn blank(variant: EntityVariant) -> Self {
        let descriptor = variant.descriptor();
        Self {
            variant,
            values: vec![Property::default(); descriptor.fields.len()],
            score: descriptor.scoring.then(ScoreCard::default),
            dependencies: None,
        }
    }

    pub fn variant(&self) -> EntityVariant {
        self.variant
    }

    pub fn descriptor(&self) -> &'static VariantDescriptor {
        self.variant.descriptor()
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(|property| match property {
            Property::Value(Value::String(id)) => Some(id.as_str()),
            _ => None,
        })
    }

    /// Declared properties in schema order.
    pub fn properties(&self) -> impl Iterator<Item = (&'static str, &Property)> {
        self.descriptor().fields.iter().copied().zip(self.values.iter())
    }

    pub fn get(&self, property: &str) -> Option<&Property> {
        self.descriptor()
            .position(property)
            .map(|index| &self.values[index])
    }

    pub fn score(&self) -> Option<&ScoreCard> {
        self.score.as_ref()
    }

    pub(crate) fn score_mut(&mut self) -> Option<&mut ScoreCard> {
        self.score.as_mut()
    }

    pub fn dependencies(&self) -> Option<&DependencyView> {
        self.dependencies.as_ref()
    }

    pub(crate) fn attach_dependencies(&mut self, view: DependencyView) {
        if self.variant.has_dependencies() {
            self.dependencies = Some(view);
        }
    }

    pub fn set_property(&mut self, property: &str, value: Property) -> Result<(), EntityError> {
        let index = self
            .descriptor()
            .position(property)
            .ok_or_else(|| EntityError::UndeclaredProperty {
                variant: self.variant,
                property: property.to_string(),
            })?;
        self.values[index] = value;
        Ok(())
    }

    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> Result<(), EntityError> {
        self.set_property(property, Property::Value(value.into()))
    }

    pub fn set_ref(&mut self, property: &str, target: EntityRef) -> Result<(), EntityError> {
        self.set_property(property, Property::Ref(target))
    }

    /// Appends to a list of references, replacing any non-list value.
    pub fn push_ref(&mut self, property: &str, target: EntityRef) -> Result<(), EntityError> {
        let index = self
            .descriptor()
            .position(property)
            .ok_or_else(|| EntityError::UndeclaredProperty {
                variant: self.variant,
                property: property.to_string(),
            })?;
        match &mut self.values[index] {
            Property::Refs(refs) => refs.push(target),
            slot => *slot = Property::Refs(vec![target]),
        }
        Ok(())
    }

    fn slot(&self, property: &str) -> Result<&Property, PropertyError> {
        self.get(property).ok_or_else(|| PropertyError::Undeclared {
            variant: self.variant,
            property: property.to_string(),
        })
    }

    fn mismatch(&self, property: &str, expected: &'static str) -> PropertyError {
        PropertyError::TypeMismatch {
            variant: self.variant,
            property: property.to_string(),
            expected,
        }
    }

    /// Plain value of a property; `None` for null or reference slots.
    pub fn value(&self, property: &str) -> Result<Option<&Value>, PropertyError> {
        Ok(match self.slot(property)? {
            Property::Value(Value::Null) => None,
            Property::Value(value) => Some(value),
            Property::Ref(_) | Property::Refs(_) => None,
        })
    }

    pub fn text(&self, property: &str) -> Result<Option<&str>, PropertyError> {
        match self.value(property)? {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.as_str())),
            Some(_) => Err(self.mismatch(property, "a string")),
        }
    }

    pub fn flag(&self, property: &str) -> Result<Option<bool>, PropertyError> {
        match self.value(property)? {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(_) => Err(self.mismatch(property, "a boolean")),
        }
    }

    pub fn number(&self, property: &str) -> Result<Option<f64>, PropertyError> {
        match self.value(property)? {
            None => Ok(None),
            Some(Value::Number(number)) => Ok(number.as_f64()),
            Some(_) => Err(self.mismatch(property, "a number")),
        }
    }

    /// Reads an RFC 3339 string or epoch milliseconds.
    pub fn date(&self, property: &str) -> Result<Option<DateTime<Utc>>, PropertyError> {
        match self.value(property)? {
            None => Ok(None),
            Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
                .map(|parsed| Some(parsed.with_timezone(&Utc)))
                .map_err(|_| self.mismatch(property, "an RFC 3339 date")),
            Some(Value::Number(millis)) => millis
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .map(Some)
                .ok_or_else(|| self.mismatch(property, "an epoch timestamp")),
            Some(_) => Err(self.mismatch(property, "a date")),
        }
    }

    /// Number of elements of a list-like property; absent counts as zero.
    pub fn count(&self, property: &str) -> Result<usize, PropertyError> {
        match self.slot(property)? {
            Property::Value(Value::Null) => Ok(0),
            Property::Value(Value::Array(items)) => Ok(items.len()),
            Property::Value(Value::Object(entries)) => Ok(entries.len()),
            Property::Refs(refs) => Ok(refs.len()),
            Property::Ref(_) => Ok(1),
            Property::Value(_) => Err(self.mismatch(property, "a list")),
        }
    }

    /// Strict truth: only an explicit `true` matches.
    pub fn is_true(&self, property: &str) -> Result<bool, PropertyError> {
        Ok(self.flag(property)? == Some(true))
    }

    /// Strict falsehood: only an explicit `false` matches, absence does not.
    pub fn is_false(&self, property: &str) -> Result<bool, PropertyError> {
        Ok(self.flag(property)? == Some(false))
    }

    /// Absent, null, blank text, empty list or empty map.
    pub fn is_empty(&self, property: &str) -> Result<bool, PropertyError> {
        Ok(match self.slot(property)? {
            Property::Value(Value::Null) => true,
            Property::Value(Value::String(text)) => text.trim().is_empty(),
            Property::Value(Value::Array(items)) => items.is_empty(),
            Property::Value(Value::Object(entries)) => entries.is_empty(),
            Property::Value(_) | Property::Ref(_) => false,
            Property::Refs(refs) => refs.is_empty(),
        })
    }

    pub fn reference(&self, property: &str) -> Result<Option<&EntityRef>, PropertyError> {
        match self.slot(property)? {
            Property::Ref(target) => Ok(Some(target)),
            Property::Value(Value::Null) => Ok(None),
            _ => Err(self.mismatch(property, "a reference")),
        }
    }

    pub fn references(&self, property: &str) -> Result<&[EntityRef], PropertyError> {
        match self.slot(property)? {
            Property::Refs(refs) => Ok(refs),
            Property::Value(Value::Null) => Ok(&[]),
            _ => Err(self.mismatch(property, "a list of references")),
        }
    }

    /// Dependency lookup succeeded and nothing references this item.
    pub fn no_dependents(&self) -> bool {
        self.dependencies
            .as_ref()
            .is_some_and(|view| !view.had_error && view.referenced.is_empty())
    }

    pub fn dependency_lookup_failed(&self) -> bool {
        self.dependencies.as_ref().is_some_and(|view| view.had_error)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, property) in self.properties() {
            match property {
                Property::Value(value) => map.serialize_entry(name, value)?,
                Property::Ref(target) => map.serialize_entry(name, target)?,
                Property::Refs(targets) => map.serialize_entry(name, targets)?,
            }
        }
        if let Some(card) = &self.score {
            map.serialize_entry("score", &card.score)?;
            map.serialize_entry("badFields", &card.bad_fields)?;
            map.serialize_entry("badReasonIds", &card.bad_reason_ids)?;
        }
        if self.variant.has_dependencies() {
            map.serialize_entry("dependencies", &self.dependencies)?;
        }
        map.end()
    }
}
