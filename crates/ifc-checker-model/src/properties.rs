// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property definitions attached to IFC entities

use crate::{AttributeValue, EntityId, IfcType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a property value, the unit of comparison between two models
///
/// Typed values (`IFCLENGTHMEASURE(0.2)`) are identified by their defined
/// type name; untyped values by their STEP primitive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Text,
    Integer,
    Real,
    /// `.T.`, `.F.` or `.U.`
    Logical,
    Enumeration,
    Reference,
    List,
    /// Defined type name, upper case
    Typed(String),
}

impl ValueKind {
    /// Classify an attribute value
    pub fn of(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Null | AttributeValue::Derived => ValueKind::Null,
            AttributeValue::String(_) => ValueKind::Text,
            AttributeValue::Integer(_) => ValueKind::Integer,
            AttributeValue::Float(_) => ValueKind::Real,
            AttributeValue::Enum(e) => match e.to_ascii_uppercase().as_str() {
                "T" | "F" | "U" | "TRUE" | "FALSE" | "UNKNOWN" => ValueKind::Logical,
                _ => ValueKind::Enumeration,
            },
            AttributeValue::EntityRef(_) => ValueKind::Reference,
            AttributeValue::List(_) => ValueKind::List,
            AttributeValue::TypedValue(name, _) => ValueKind::Typed(name.to_ascii_uppercase()),
        }
    }

    /// True when a value of kind `other` is an instance of this kind
    ///
    /// Kinds must be identical; there is no numeric widening.
    pub fn accepts(&self, other: &ValueKind) -> bool {
        self == other
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => f.write_str("null"),
            ValueKind::Text => f.write_str("text"),
            ValueKind::Integer => f.write_str("integer"),
            ValueKind::Real => f.write_str("real"),
            ValueKind::Logical => f.write_str("logical"),
            ValueKind::Enumeration => f.write_str("enumeration"),
            ValueKind::Reference => f.write_str("reference"),
            ValueKind::List => f.write_str("list"),
            ValueKind::Typed(name) => f.write_str(name),
        }
    }
}

/// A single property of a property set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Entity holding the property
    pub id: EntityId,
    /// Property entity type (`IfcPropertySingleValue`, ...)
    pub ifc_type: IfcType,
    /// Property name
    pub name: String,
    /// The property's value: NominalValue for single values, the value list
    /// for enumerated and list values, the upper bound for bounded values
    pub value: AttributeValue,
}

impl Property {
    /// Kind of the value carried by this property
    pub fn kind(&self) -> ValueKind {
        ValueKind::of(&self.value)
    }
}

/// A property definition related to an entity through
/// `IfcRelDefinesByProperties`
///
/// For `IfcPropertySet` the properties are listed in native order; other
/// definitions (quantity sets and the like) carry a name but no properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Entity holding the definition
    pub id: EntityId,
    /// Definition type
    pub ifc_type: IfcType,
    /// Definition name (e.g., "Pset_WallCommon")
    pub name: Option<String>,
    /// Properties in native order
    pub properties: Vec<Property>,
}

impl PropertyDefinition {
    /// Check whether this definition is an `IfcPropertySet`
    pub fn is_property_set(&self) -> bool {
        self.ifc_type == IfcType::IfcPropertySet
    }

    /// Get the first property with the given name
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Property names in native order
    pub fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }
}

/// Property reader trait
///
/// Property definitions come from entities linked via
/// `IfcRelDefinesByProperties` (RelatedObjects at attribute 4,
/// RelatingPropertyDefinition at attribute 5).
///
/// # Example
///
/// ```ignore
/// use ifc_checker_model::{PropertyReader, EntityId};
///
/// fn print_psets(props: &dyn PropertyReader, wall: EntityId) {
///     for def in props.property_definitions(wall) {
///         println!("{:?}", def.name);
///         for prop in &def.properties {
///             println!("  {}: {}", prop.name, prop.kind());
///         }
///     }
/// }
/// ```
pub trait PropertyReader: Send + Sync {
    /// `IfcRelDefinesByProperties` relationships relating `id`, in file order
    fn defined_by(&self, id: EntityId) -> Vec<EntityId>;

    /// Property definitions related to `id`, in relationship order
    fn property_definitions(&self, id: EntityId) -> Vec<PropertyDefinition>;

    /// Every `IfcPropertySet` named `name`, ordered by entity ID
    fn property_sets_named(&self, name: &str) -> Vec<PropertyDefinition>;

    /// Get a specific property by set and property name
    fn get_property(&self, id: EntityId, pset: &str, name: &str) -> Option<Property> {
        self.property_definitions(id)
            .into_iter()
            .filter(|def| def.name.as_deref() == Some(pset))
            .find_map(|def| def.get(name).cloned())
    }
}
