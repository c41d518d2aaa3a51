// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ModelBuilder - construct new models from scratch or from parts of others

use crate::model::StepModel;
use ifc_checker_model::{
    AttributeValue, DecodedEntity, EntityId, EntityResolver, Error, IfcType, ModelMetadata,
    Result,
};
use rustc_hash::FxHashMap;

/// Builder for a new in-memory model
///
/// Instance numbers are assigned sequentially from `#1`. Entities copied
/// from a source model bring everything they reference along; each source
/// entity is copied at most once, so shared resources (owner history,
/// units, placements) stay shared in the new model.
///
/// A builder copies from a single source model.
///
/// # Example
///
/// ```ignore
/// let mut builder = ModelBuilder::new("IFC4");
/// let wall = builder.copy_from(source.resolver(), wall_id)?;
/// let model = builder.build()?;
/// std::fs::write("reduced.ifc", model.to_step())?;
/// ```
pub struct ModelBuilder {
    metadata: ModelMetadata,
    entities: Vec<DecodedEntity>,
    next_id: u32,
    /// Source ID -> ID of its copy
    copies: FxHashMap<EntityId, EntityId>,
}

impl ModelBuilder {
    /// Start an empty model for the given schema
    pub fn new(schema_version: &str) -> Self {
        let metadata = ModelMetadata {
            preprocessor_version: Some(concat!("ifc-checker ", env!("CARGO_PKG_VERSION")).into()),
            ..ModelMetadata::for_schema(schema_version)
        };
        Self::with_metadata(metadata)
    }

    /// Start an empty model with explicit header metadata
    pub fn with_metadata(metadata: ModelMetadata) -> Self {
        Self {
            metadata,
            entities: Vec::new(),
            next_id: 1,
            copies: FxHashMap::default(),
        }
    }

    fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Number of entities added so far
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when nothing has been added
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Add a new entity; references in `attributes` must point into this model
    pub fn add(&mut self, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> EntityId {
        let id = self.next_id();
        self.entities.push(DecodedEntity::new(id, ifc_type, attributes));
        id
    }

    /// ID of the copy of `source_id`, if it has been copied
    pub fn copy_of(&self, source_id: EntityId) -> Option<EntityId> {
        self.copies.get(&source_id).copied()
    }

    /// Deep-copy an entity and everything it references
    pub fn copy_from(&mut self, source: &dyn EntityResolver, id: EntityId) -> Result<EntityId> {
        self.copy_entity(source, id, None)
    }

    /// Deep-copy an entity, keeping only its first `keep` attributes
    ///
    /// The remaining attributes are written as `$`, so the attribute count
    /// is unchanged.
    pub fn copy_leading(
        &mut self,
        source: &dyn EntityResolver,
        id: EntityId,
        keep: usize,
    ) -> Result<EntityId> {
        self.copy_entity(source, id, Some(keep))
    }

    fn copy_entity(
        &mut self,
        source: &dyn EntityResolver,
        id: EntityId,
        keep: Option<usize>,
    ) -> Result<EntityId> {
        if let Some(copied) = self.copy_of(id) {
            return Ok(copied);
        }
        let entity = source.get(id).ok_or(Error::EntityNotFound(id))?;

        // Reserve the ID first so reference cycles terminate
        let new_id = self.next_id();
        self.copies.insert(id, new_id);

        let count = entity.attributes.len();
        let kept = keep.unwrap_or(count).min(count);
        for attr in &entity.attributes[..kept] {
            let mut targets = Vec::new();
            attr.for_each_ref(&mut |target| targets.push(target));
            for target in targets {
                if source.get(target).is_none() {
                    return Err(Error::DanglingReference { entity: id, target });
                }
                self.copy_entity(source, target, None)?;
            }
        }

        // Every reference in the kept attributes now has a copy
        let copies = &self.copies;
        let mut attributes: Vec<AttributeValue> = entity.attributes[..kept]
            .iter()
            .map(|attr| {
                attr.map_refs(&mut |target| copies.get(&target).copied().unwrap_or(target))
            })
            .collect();
        attributes.resize(count, AttributeValue::Null);

        self.entities
            .push(DecodedEntity::new(new_id, entity.ifc_type.clone(), attributes));
        Ok(new_id)
    }

    /// Finish the model; entities are ordered by instance number
    pub fn build(mut self) -> Result<StepModel> {
        self.entities.sort_by_key(|e| e.id);
        StepModel::from_entities(self.metadata, self.entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_checker_model::IfcModel;

    const TEST_IFC: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#5=IFCOWNERHISTORY(#6,$,$,.ADDED.,$,$,$,0);
#6=IFCPERSONANDORGANIZATION($,$,$);
#7=IFCLOCALPLACEMENT($,$);
#10=IFCWALL('w1',#5,'Wall A',$,$,#7,$,$,$);
#11=IFCWALL('w2',#5,'Wall B',$,$,#7,$,$,$);
#20=IFCPROJECT('p',#5,'Project',$,$,$,$,(#21),#22);
#21=IFCGEOMETRICREPRESENTATIONCONTEXT($,'Model',3,1.E-05,#7,$);
#22=IFCUNITASSIGNMENT(());
#30=IFCWALL('w3',#99,$,$,$,$,$,$,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_copy_brings_references_and_shares_them() {
        let source = StepModel::parse(TEST_IFC).unwrap();
        let mut builder = ModelBuilder::new("IFC4");

        let a = builder.copy_from(source.resolver(), EntityId(10)).unwrap();
        let b = builder.copy_from(source.resolver(), EntityId(11)).unwrap();
        assert_eq!(a, EntityId(1));
        // Wall A, owner history, person, placement, then Wall B
        assert_eq!(builder.len(), 5);
        assert_eq!(b, EntityId(5));

        let model = builder.build().unwrap();
        let wall_a = model.resolver().get(a).unwrap();
        let wall_b = model.resolver().get(b).unwrap();
        assert_eq!(wall_a.get_string(2), Some("Wall A"));
        assert_eq!(wall_a.get_ref(1), wall_b.get_ref(1));
        assert_eq!(wall_a.get_ref(5), wall_b.get_ref(5));
        assert_eq!(
            model.resolver().all_ids(),
            (1..=5).map(EntityId).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_copy_leading_blanks_trailing_attributes() {
        let source = StepModel::parse(TEST_IFC).unwrap();
        let mut builder = ModelBuilder::new("IFC4");

        let project = builder
            .copy_leading(source.resolver(), EntityId(20), 7)
            .unwrap();
        let model = builder.build().unwrap();

        let project = model.resolver().get(project).unwrap();
        assert_eq!(project.attributes.len(), 9);
        assert_eq!(project.get_string(2), Some("Project"));
        assert!(project.get(7).unwrap().is_null());
        assert!(project.get(8).unwrap().is_null());
        // Project, owner history, person; no context or units
        assert_eq!(model.resolver().entity_count(), 3);
    }

    #[test]
    fn test_references_inside_lists_are_rewritten() {
        let source = StepModel::parse(TEST_IFC).unwrap();
        let mut builder = ModelBuilder::new("IFC4");

        let project = builder.copy_from(source.resolver(), EntityId(20)).unwrap();
        let model = builder.build().unwrap();
        let resolver = model.resolver();

        let project = resolver.get(project).unwrap();
        let contexts = project.get_refs(7).unwrap();
        assert_eq!(contexts.len(), 1);
        let context = resolver.get(contexts[0]).unwrap();
        assert_eq!(context.ifc_type, IfcType::IfcGeometricRepresentationContext);
        // The placement inside the context is a copy as well
        let placement = resolver.get(context.get_ref(4).unwrap()).unwrap();
        assert_eq!(placement.ifc_type, IfcType::IfcLocalPlacement);
        assert_eq!(
            resolver.get(project.get_ref(8).unwrap()).unwrap().ifc_type,
            IfcType::IfcUnitAssignment
        );
        // Every reference in the new model resolves inside it
        for id in resolver.all_ids() {
            let entity = resolver.get(id).unwrap();
            for attr in &entity.attributes {
                attr.for_each_ref(&mut |target| assert!(resolver.get(target).is_some()));
            }
        }
    }

    #[test]
    fn test_dangling_reference_is_reported() {
        let source = StepModel::parse(TEST_IFC).unwrap();
        let mut builder = ModelBuilder::new("IFC4");

        let err = builder
            .copy_from(source.resolver(), EntityId(30))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DanglingReference {
                entity: EntityId(30),
                target: EntityId(99)
            }
        ));
    }

    #[test]
    fn test_add_new_entities() {
        let mut builder = ModelBuilder::new("IFC2X3");
        assert!(builder.is_empty());
        let id = builder.add(
            IfcType::IfcPropertySet,
            vec![
                AttributeValue::String("guid".into()),
                AttributeValue::Null,
                AttributeValue::String("Pset_Test".into()),
                AttributeValue::Null,
                AttributeValue::List(vec![]),
            ],
        );
        let model = builder.build().unwrap();
        assert_eq!(model.metadata().schema_version, "IFC2X3");
        assert_eq!(
            model.properties().property_sets_named("Pset_Test")[0].id,
            id
        );
    }
}
