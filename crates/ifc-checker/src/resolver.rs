// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property value lookup by type, set and property name

use crate::error::{CheckError, Result};
use ifc_checker_model::{AttributeValue, EntityId, IfcModel, IfcType, ValueKind};
use serde::Serialize;

/// A resolved property value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyValue {
    /// Instance the value was found on
    pub entity: EntityId,
    /// Property entity type (`IfcPropertySingleValue`, ...)
    pub property_type: IfcType,
    pub name: String,
    pub value: AttributeValue,
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        ValueKind::of(&self.value)
    }
}

/// Find the value of `property_name` in set `pset_name` on some instance of
/// `type_name`
///
/// Instances are tried in file order, and for each instance its property
/// sets in relationship order; the first match wins.
pub fn resolve(
    model: &dyn IfcModel,
    type_name: &str,
    pset_name: &str,
    property_name: &str,
) -> Result<PropertyValue> {
    let properties = model.properties();
    model
        .resolver()
        .find_by_type_name(type_name)
        .iter()
        .find_map(|entity| {
            properties
                .get_property(entity.id, pset_name, property_name)
                .map(|prop| PropertyValue {
                    entity: entity.id,
                    property_type: prop.ifc_type,
                    name: prop.name,
                    value: prop.value,
                })
        })
        .ok_or_else(|| CheckError::property_not_found(type_name, pset_name, property_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_checker_parser::StepModel;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC2X3'));
ENDSEC;
DATA;
#1=IFCWALL('w1',$,$,$,$,$,$,$);
#2=IFCWALL('w2',$,$,$,$,$,$,$);
#10=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI60'),$);
#11=IFCPROPERTYSET('a',$,'Pset_WallCommon',$,(#10));
#12=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI90'),$);
#13=IFCPROPERTYSINGLEVALUE('ThermalTransmittance',$,IFCTHERMALTRANSMITTANCEMEASURE(0.24),$);
#14=IFCPROPERTYSET('b',$,'Pset_WallCommon',$,(#12,#13));
#20=IFCRELDEFINESBYPROPERTIES('r1',$,$,$,(#2),#14);
#21=IFCRELDEFINESBYPROPERTIES('r2',$,$,$,(#1),#11);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_first_instance_in_file_order_wins() {
        let model = StepModel::parse(TEST_IFC).unwrap();
        let value = resolve(&model, "IfcWall", "Pset_WallCommon", "FireRating").unwrap();
        assert_eq!(value.entity, EntityId(1));
        assert_eq!(value.property_type, IfcType::IfcPropertySingleValue);
        assert_eq!(
            value.value,
            AttributeValue::TypedValue(
                "IFCLABEL".into(),
                vec![AttributeValue::String("REI60".into())]
            )
        );
        assert_eq!(value.kind(), ValueKind::Typed("IFCLABEL".into()));
    }

    #[test]
    fn test_falls_through_to_later_instances() {
        let model = StepModel::parse(TEST_IFC).unwrap();
        let value = resolve(&model, "IFCWALL", "Pset_WallCommon", "ThermalTransmittance").unwrap();
        assert_eq!(value.entity, EntityId(2));
        assert_eq!(
            value.kind(),
            ValueKind::Typed("IFCTHERMALTRANSMITTANCEMEASURE".into())
        );
    }

    #[test]
    fn test_not_found() {
        let model = StepModel::parse(TEST_IFC).unwrap();
        for (t, p, n) in [
            ("IfcWall", "Pset_WallCommon", "Missing"),
            ("IfcWall", "Pset_Other", "FireRating"),
            ("IfcDoor", "Pset_WallCommon", "FireRating"),
        ] {
            let err = resolve(&model, t, p, n).unwrap_err();
            assert!(matches!(
                err,
                CheckError::PropertyNotFound { ref entity_type, ref pset, ref property }
                    if entity_type == t && pset == p && property == n
            ));
        }
    }
}
