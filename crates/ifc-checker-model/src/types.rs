// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IFC data representation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe entity identifier
///
/// Wraps the raw STEP instance name (e.g., #123 becomes EntityId(123))
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Declares the known entity types together with their canonical spelling.
///
/// Parsing is case-insensitive; STEP files spell every type in upper case
/// while IFC documentation (and the engine's reports) use CamelCase.
macro_rules! ifc_types {
    ($($variant:ident => $name:literal,)*) => {
        /// IFC entity type
        ///
        /// Covers the entity types the checker reasons about. Anything else
        /// is kept as [`IfcType::Unknown`] with its upper-cased STEP name.
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub enum IfcType {
            $($variant,)*
            /// Unknown type - stores the upper-cased type name
            Unknown(String),
        }

        impl IfcType {
            /// Parse a type name string into an IfcType
            pub fn parse(s: &str) -> Self {
                $(
                    if s.eq_ignore_ascii_case($name) {
                        return IfcType::$variant;
                    }
                )*
                IfcType::Unknown(s.to_ascii_uppercase())
            }

            /// Canonical type name (`IfcWall`)
            ///
            /// Unknown product entities get their canonical spelling too; any
            /// other unknown type keeps its upper-cased STEP name.
            pub fn name(&self) -> &str {
                match self {
                    $(IfcType::$variant => $name,)*
                    IfcType::Unknown(s) => {
                        crate::schema::canonical_product_name(s).unwrap_or(s)
                    }
                }
            }
        }
    };
}

ifc_types! {
    // Abstract supertype used for family queries
    IfcProduct => "IfcProduct",

    // Spatial structure and groups
    IfcProject => "IfcProject",
    IfcSite => "IfcSite",
    IfcBuilding => "IfcBuilding",
    IfcBuildingStorey => "IfcBuildingStorey",
    IfcSpace => "IfcSpace",
    IfcExternalSpatialElement => "IfcExternalSpatialElement",
    IfcZone => "IfcZone",

    // Building elements
    IfcWall => "IfcWall",
    IfcWallStandardCase => "IfcWallStandardCase",
    IfcWallElementedCase => "IfcWallElementedCase",
    IfcCurtainWall => "IfcCurtainWall",
    IfcSlab => "IfcSlab",
    IfcSlabStandardCase => "IfcSlabStandardCase",
    IfcSlabElementedCase => "IfcSlabElementedCase",
    IfcRoof => "IfcRoof",
    IfcBeam => "IfcBeam",
    IfcBeamStandardCase => "IfcBeamStandardCase",
    IfcColumn => "IfcColumn",
    IfcColumnStandardCase => "IfcColumnStandardCase",
    IfcDoor => "IfcDoor",
    IfcDoorStandardCase => "IfcDoorStandardCase",
    IfcWindow => "IfcWindow",
    IfcWindowStandardCase => "IfcWindowStandardCase",
    IfcStair => "IfcStair",
    IfcStairFlight => "IfcStairFlight",
    IfcRamp => "IfcRamp",
    IfcRampFlight => "IfcRampFlight",
    IfcRailing => "IfcRailing",
    IfcCovering => "IfcCovering",
    IfcPlate => "IfcPlate",
    IfcPlateStandardCase => "IfcPlateStandardCase",
    IfcMember => "IfcMember",
    IfcMemberStandardCase => "IfcMemberStandardCase",
    IfcFooting => "IfcFooting",
    IfcPile => "IfcPile",
    IfcChimney => "IfcChimney",
    IfcShadingDevice => "IfcShadingDevice",
    IfcBuildingElementProxy => "IfcBuildingElementProxy",
    IfcBuildingElementPart => "IfcBuildingElementPart",
    IfcElementAssembly => "IfcElementAssembly",

    // Distribution elements (MEP)
    IfcDistributionElement => "IfcDistributionElement",
    IfcDistributionFlowElement => "IfcDistributionFlowElement",
    IfcDistributionControlElement => "IfcDistributionControlElement",
    IfcDistributionPort => "IfcDistributionPort",
    IfcFlowTerminal => "IfcFlowTerminal",
    IfcFlowSegment => "IfcFlowSegment",
    IfcFlowFitting => "IfcFlowFitting",
    IfcFlowController => "IfcFlowController",
    IfcFlowMovingDevice => "IfcFlowMovingDevice",
    IfcFlowStorageDevice => "IfcFlowStorageDevice",
    IfcFlowTreatmentDevice => "IfcFlowTreatmentDevice",
    IfcEnergyConversionDevice => "IfcEnergyConversionDevice",

    // Furnishing
    IfcFurnishingElement => "IfcFurnishingElement",
    IfcFurniture => "IfcFurniture",
    IfcSystemFurnitureElement => "IfcSystemFurnitureElement",

    // Openings and features
    IfcOpeningElement => "IfcOpeningElement",
    IfcOpeningStandardCase => "IfcOpeningStandardCase",
    IfcVoidingFeature => "IfcVoidingFeature",
    IfcProjectionElement => "IfcProjectionElement",

    // Other products
    IfcAnnotation => "IfcAnnotation",
    IfcGrid => "IfcGrid",
    IfcProxy => "IfcProxy",
    IfcVirtualElement => "IfcVirtualElement",
    IfcTransportElement => "IfcTransportElement",
    IfcDiscreteAccessory => "IfcDiscreteAccessory",
    IfcFastener => "IfcFastener",
    IfcMechanicalFastener => "IfcMechanicalFastener",
    IfcReinforcingBar => "IfcReinforcingBar",
    IfcReinforcingMesh => "IfcReinforcingMesh",
    IfcTendon => "IfcTendon",
    IfcTendonAnchor => "IfcTendonAnchor",
    IfcGeographicElement => "IfcGeographicElement",
    IfcCivilElement => "IfcCivilElement",

    // Relationships
    IfcRelDefinesByProperties => "IfcRelDefinesByProperties",
    IfcRelDefinesByType => "IfcRelDefinesByType",
    IfcRelAggregates => "IfcRelAggregates",
    IfcRelContainedInSpatialStructure => "IfcRelContainedInSpatialStructure",
    IfcRelAssociatesMaterial => "IfcRelAssociatesMaterial",
    IfcRelVoidsElement => "IfcRelVoidsElement",
    IfcRelFillsElement => "IfcRelFillsElement",
    IfcRelAssignsToGroup => "IfcRelAssignsToGroup",
    IfcRelSpaceBoundary => "IfcRelSpaceBoundary",

    // Property definitions
    IfcPropertySet => "IfcPropertySet",
    IfcPropertySingleValue => "IfcPropertySingleValue",
    IfcPropertyEnumeratedValue => "IfcPropertyEnumeratedValue",
    IfcPropertyBoundedValue => "IfcPropertyBoundedValue",
    IfcPropertyListValue => "IfcPropertyListValue",
    IfcPropertyTableValue => "IfcPropertyTableValue",
    IfcPropertyReferenceValue => "IfcPropertyReferenceValue",
    IfcComplexProperty => "IfcComplexProperty",
    IfcElementQuantity => "IfcElementQuantity",
    IfcQuantityLength => "IfcQuantityLength",
    IfcQuantityArea => "IfcQuantityArea",
    IfcQuantityVolume => "IfcQuantityVolume",
    IfcQuantityCount => "IfcQuantityCount",
    IfcQuantityWeight => "IfcQuantityWeight",
    IfcQuantityTime => "IfcQuantityTime",

    // Resources commonly referenced by products
    IfcOwnerHistory => "IfcOwnerHistory",
    IfcPerson => "IfcPerson",
    IfcOrganization => "IfcOrganization",
    IfcPersonAndOrganization => "IfcPersonAndOrganization",
    IfcApplication => "IfcApplication",
    IfcUnitAssignment => "IfcUnitAssignment",
    IfcSIUnit => "IfcSIUnit",
    IfcLocalPlacement => "IfcLocalPlacement",
    IfcAxis2Placement3D => "IfcAxis2Placement3D",
    IfcCartesianPoint => "IfcCartesianPoint",
    IfcDirection => "IfcDirection",
    IfcProductDefinitionShape => "IfcProductDefinitionShape",
    IfcShapeRepresentation => "IfcShapeRepresentation",
    IfcGeometricRepresentationContext => "IfcGeometricRepresentationContext",
    IfcMaterial => "IfcMaterial",

    // Type objects
    IfcWallType => "IfcWallType",
    IfcDoorType => "IfcDoorType",
    IfcWindowType => "IfcWindowType",
    IfcSlabType => "IfcSlabType",
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IfcType {
    /// Upper-case spelling used inside STEP files (`IFCWALL`)
    pub fn step_name(&self) -> String {
        self.name().to_ascii_uppercase()
    }

    /// Direct supertype within the `IfcProduct` subtree
    ///
    /// Abstract supertypes without a variant (`IfcBuildingElement`,
    /// `IfcElement`, ...) come back as [`IfcType::Unknown`].
    pub fn supertype(&self) -> Option<IfcType> {
        crate::schema::product_supertype(self.name()).map(IfcType::parse)
    }

    /// Check if this type belongs to the `IfcProduct` family
    ///
    /// Products are the physical and spatial objects of a model, as opposed
    /// to relationships, property definitions and geometry resources. The
    /// test covers the IFC2X3, IFC4 and IFC4X3 product entities, including
    /// those without a variant of their own.
    pub fn is_product(&self) -> bool {
        crate::schema::product_supertype(self.name()).is_some()
    }

    /// Subtype test: `self` is `other` or one of its known specialisations
    pub fn is_a(&self, other: &IfcType) -> bool {
        if self == other {
            return true;
        }
        let mut current = self.supertype();
        while let Some(parent) = current {
            if parent == *other {
                return true;
            }
            current = parent.supertype();
        }
        false
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoded attribute value
///
/// Represents any value that can appear in an IFC entity's attribute list.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum AttributeValue {
    /// Null value ($)
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value, with STEP quote escapes already removed
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCLABEL('text')
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_string(),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_float(),
            _ => None,
        }
    }

    /// Try to get as boolean (`.T.` / `.F.`)
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Enum(s) => match s.to_ascii_uppercase().as_str() {
                "TRUE" | "T" => Some(true),
                "FALSE" | "F" => Some(false),
                _ => None,
            },
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_bool(),
            _ => None,
        }
    }

    /// Try to get as enum string
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Visit every entity reference nested in this value, depth first
    pub fn for_each_ref(&self, f: &mut impl FnMut(EntityId)) {
        match self {
            AttributeValue::EntityRef(id) => f(*id),
            AttributeValue::List(items) | AttributeValue::TypedValue(_, items) => {
                for item in items {
                    item.for_each_ref(f);
                }
            }
            _ => {}
        }
    }

    /// Rewrite every entity reference through `f`, keeping the shape
    pub fn map_refs(&self, f: &mut impl FnMut(EntityId) -> EntityId) -> AttributeValue {
        match self {
            AttributeValue::EntityRef(id) => AttributeValue::EntityRef(f(*id)),
            AttributeValue::List(items) => {
                AttributeValue::List(items.iter().map(|item| item.map_refs(f)).collect())
            }
            AttributeValue::TypedValue(name, args) => AttributeValue::TypedValue(
                name.clone(),
                args.iter().map(|arg| arg.map_refs(f)).collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Decoded IFC entity
///
/// Represents a fully decoded IFC entity with its ID, type, and attribute values.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedEntity {
    /// Entity ID
    pub id: EntityId,
    /// Entity type
    pub ifc_type: IfcType,
    /// Attribute values in order
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Create a new entity
    pub fn new(id: EntityId, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> Self {
        Self {
            id,
            ifc_type,
            attributes,
        }
    }

    /// Get attribute at index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference at index
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string at index
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// Get float at index
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get list at index
    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(|v| v.as_list())
    }

    /// Get list of entity references at index
    pub fn get_refs(&self, index: usize) -> Option<Vec<EntityId>> {
        self.get_list(index)
            .map(|list| list.iter().filter_map(|v| v.as_entity_ref()).collect())
    }
}

/// Model metadata extracted from the STEP header
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// IFC schema version (e.g., "IFC2X3", "IFC4", "IFC4X3")
    pub schema_version: String,
    /// Originating system (CAD application)
    pub originating_system: Option<String>,
    /// Preprocessor version
    pub preprocessor_version: Option<String>,
    /// File name from header
    pub file_name: Option<String>,
    /// File description
    pub file_description: Option<String>,
    /// Author
    pub author: Option<String>,
    /// Organization
    pub organization: Option<String>,
    /// Timestamp
    pub timestamp: Option<String>,
}

impl ModelMetadata {
    /// Metadata for a freshly built model of the given schema
    pub fn for_schema(schema_version: impl Into<String>) -> Self {
        Self {
            schema_version: schema_version.into(),
            ..Self::default()
        }
    }
}
