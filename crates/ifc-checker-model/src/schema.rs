// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `IfcProduct` subtree of the IFC2X3, IFC4 and IFC4X3 schemas
//!
//! One row per product entity, child then direct supertype. Entities that
//! moved between schema versions carry their IFC4 supertype. Rows are
//! sorted case-insensitively so lookups can binary search with STEP
//! (upper case) and canonical (CamelCase) spellings alike.

use std::cmp::Ordering;

const PRODUCT_HIERARCHY: &[(&str, &str)] = &[
    ("IfcActuator", "IfcDistributionControlElement"),
    ("IfcAirTerminal", "IfcFlowTerminal"),
    ("IfcAirTerminalBox", "IfcFlowController"),
    ("IfcAirToAirHeatRecovery", "IfcEnergyConversionDevice"),
    ("IfcAlarm", "IfcDistributionControlElement"),
    ("IfcAlignment", "IfcLinearPositioningElement"),
    ("IfcAlignmentCant", "IfcLinearElement"),
    ("IfcAlignmentHorizontal", "IfcLinearElement"),
    ("IfcAlignmentSegment", "IfcLinearElement"),
    ("IfcAlignmentVertical", "IfcLinearElement"),
    ("IfcAnnotation", "IfcProduct"),
    ("IfcAudioVisualAppliance", "IfcFlowTerminal"),
    ("IfcBeam", "IfcBuildingElement"),
    ("IfcBeamStandardCase", "IfcBeam"),
    ("IfcBearing", "IfcBuiltElement"),
    ("IfcBoiler", "IfcEnergyConversionDevice"),
    ("IfcBorehole", "IfcGeotechnicalAssembly"),
    ("IfcBridge", "IfcFacility"),
    ("IfcBridgePart", "IfcFacilityPart"),
    ("IfcBuilding", "IfcSpatialStructureElement"),
    ("IfcBuildingElement", "IfcElement"),
    ("IfcBuildingElementComponent", "IfcBuildingElement"),
    ("IfcBuildingElementPart", "IfcElementComponent"),
    ("IfcBuildingElementProxy", "IfcBuildingElement"),
    ("IfcBuildingStorey", "IfcSpatialStructureElement"),
    ("IfcBuiltElement", "IfcElement"),
    ("IfcBurner", "IfcEnergyConversionDevice"),
    ("IfcCableCarrierFitting", "IfcFlowFitting"),
    ("IfcCableCarrierSegment", "IfcFlowSegment"),
    ("IfcCableFitting", "IfcFlowFitting"),
    ("IfcCableSegment", "IfcFlowSegment"),
    ("IfcCaissonFoundation", "IfcDeepFoundation"),
    ("IfcChamferEdgeFeature", "IfcEdgeFeature"),
    ("IfcChiller", "IfcEnergyConversionDevice"),
    ("IfcChimney", "IfcBuildingElement"),
    ("IfcCivilElement", "IfcElement"),
    ("IfcCoil", "IfcEnergyConversionDevice"),
    ("IfcColumn", "IfcBuildingElement"),
    ("IfcColumnStandardCase", "IfcColumn"),
    ("IfcCommunicationsAppliance", "IfcFlowTerminal"),
    ("IfcCompressor", "IfcFlowMovingDevice"),
    ("IfcCondenser", "IfcEnergyConversionDevice"),
    ("IfcController", "IfcDistributionControlElement"),
    ("IfcConveyorSegment", "IfcFlowSegment"),
    ("IfcCooledBeam", "IfcEnergyConversionDevice"),
    ("IfcCoolingTower", "IfcEnergyConversionDevice"),
    ("IfcCourse", "IfcBuiltElement"),
    ("IfcCovering", "IfcBuildingElement"),
    ("IfcCurtainWall", "IfcBuildingElement"),
    ("IfcDamper", "IfcFlowController"),
    ("IfcDeepFoundation", "IfcBuiltElement"),
    ("IfcDiscreteAccessory", "IfcElementComponent"),
    ("IfcDistributionBoard", "IfcFlowController"),
    ("IfcDistributionChamberElement", "IfcDistributionFlowElement"),
    ("IfcDistributionControlElement", "IfcDistributionElement"),
    ("IfcDistributionElement", "IfcElement"),
    ("IfcDistributionFlowElement", "IfcDistributionElement"),
    ("IfcDistributionPort", "IfcPort"),
    ("IfcDoor", "IfcBuildingElement"),
    ("IfcDoorStandardCase", "IfcDoor"),
    ("IfcDuctFitting", "IfcFlowFitting"),
    ("IfcDuctSegment", "IfcFlowSegment"),
    ("IfcDuctSilencer", "IfcFlowTreatmentDevice"),
    ("IfcEarthworksCut", "IfcFeatureElementSubtraction"),
    ("IfcEarthworksElement", "IfcBuiltElement"),
    ("IfcEarthworksFill", "IfcEarthworksElement"),
    ("IfcEdgeFeature", "IfcFeatureElementSubtraction"),
    ("IfcElectricalElement", "IfcElement"),
    ("IfcElectricAppliance", "IfcFlowTerminal"),
    ("IfcElectricDistributionBoard", "IfcFlowController"),
    ("IfcElectricDistributionPoint", "IfcFlowController"),
    ("IfcElectricFlowStorageDevice", "IfcFlowStorageDevice"),
    ("IfcElectricFlowTreatmentDevice", "IfcFlowTreatmentDevice"),
    ("IfcElectricGenerator", "IfcEnergyConversionDevice"),
    ("IfcElectricMotor", "IfcEnergyConversionDevice"),
    ("IfcElectricTimeControl", "IfcFlowController"),
    ("IfcElement", "IfcProduct"),
    ("IfcElementAssembly", "IfcElement"),
    ("IfcElementComponent", "IfcElement"),
    ("IfcEnergyConversionDevice", "IfcDistributionFlowElement"),
    ("IfcEngine", "IfcEnergyConversionDevice"),
    ("IfcEquipmentElement", "IfcElement"),
    ("IfcEvaporativeCooler", "IfcEnergyConversionDevice"),
    ("IfcEvaporator", "IfcEnergyConversionDevice"),
    ("IfcExternalSpatialElement", "IfcExternalSpatialStructureElement"),
    ("IfcExternalSpatialStructureElement", "IfcSpatialElement"),
    ("IfcFacility", "IfcSpatialStructureElement"),
    ("IfcFacilityPart", "IfcSpatialStructureElement"),
    ("IfcFacilityPartCommon", "IfcFacilityPart"),
    ("IfcFan", "IfcFlowMovingDevice"),
    ("IfcFastener", "IfcElementComponent"),
    ("IfcFeatureElement", "IfcElement"),
    ("IfcFeatureElementAddition", "IfcFeatureElement"),
    ("IfcFeatureElementSubtraction", "IfcFeatureElement"),
    ("IfcFilter", "IfcFlowTreatmentDevice"),
    ("IfcFireSuppressionTerminal", "IfcFlowTerminal"),
    ("IfcFlowController", "IfcDistributionFlowElement"),
    ("IfcFlowFitting", "IfcDistributionFlowElement"),
    ("IfcFlowInstrument", "IfcDistributionControlElement"),
    ("IfcFlowMeter", "IfcFlowController"),
    ("IfcFlowMovingDevice", "IfcDistributionFlowElement"),
    ("IfcFlowSegment", "IfcDistributionFlowElement"),
    ("IfcFlowStorageDevice", "IfcDistributionFlowElement"),
    ("IfcFlowTerminal", "IfcDistributionFlowElement"),
    ("IfcFlowTreatmentDevice", "IfcDistributionFlowElement"),
    ("IfcFooting", "IfcBuildingElement"),
    ("IfcFurnishingElement", "IfcElement"),
    ("IfcFurniture", "IfcFurnishingElement"),
    ("IfcGeographicElement", "IfcElement"),
    ("IfcGeomodel", "IfcGeotechnicalAssembly"),
    ("IfcGeoslice", "IfcGeotechnicalAssembly"),
    ("IfcGeotechnicalAssembly", "IfcGeotechnicalElement"),
    ("IfcGeotechnicalElement", "IfcElement"),
    ("IfcGeotechnicalStratum", "IfcGeotechnicalElement"),
    ("IfcGrid", "IfcProduct"),
    ("IfcHeatExchanger", "IfcEnergyConversionDevice"),
    ("IfcHumidifier", "IfcEnergyConversionDevice"),
    ("IfcImpactProtectionDevice", "IfcElementComponent"),
    ("IfcInterceptor", "IfcFlowTreatmentDevice"),
    ("IfcJunctionBox", "IfcFlowFitting"),
    ("IfcKerb", "IfcBuiltElement"),
    ("IfcLamp", "IfcFlowTerminal"),
    ("IfcLightFixture", "IfcFlowTerminal"),
    ("IfcLinearElement", "IfcProduct"),
    ("IfcLinearPositioningElement", "IfcPositioningElement"),
    ("IfcLiquidTerminal", "IfcFlowTerminal"),
    ("IfcMarineFacility", "IfcFacility"),
    ("IfcMarinePart", "IfcFacilityPart"),
    ("IfcMechanicalFastener", "IfcElementComponent"),
    ("IfcMedicalDevice", "IfcFlowTerminal"),
    ("IfcMember", "IfcBuildingElement"),
    ("IfcMemberStandardCase", "IfcMember"),
    ("IfcMobileTelecommunicationsAppliance", "IfcFlowTerminal"),
    ("IfcMooringDevice", "IfcBuiltElement"),
    ("IfcMotorConnection", "IfcEnergyConversionDevice"),
    ("IfcNavigationElement", "IfcBuiltElement"),
    ("IfcOpeningElement", "IfcFeatureElementSubtraction"),
    ("IfcOpeningStandardCase", "IfcOpeningElement"),
    ("IfcOutlet", "IfcFlowTerminal"),
    ("IfcPavement", "IfcBuiltElement"),
    ("IfcPile", "IfcBuildingElement"),
    ("IfcPipeFitting", "IfcFlowFitting"),
    ("IfcPipeSegment", "IfcFlowSegment"),
    ("IfcPlate", "IfcBuildingElement"),
    ("IfcPlateStandardCase", "IfcPlate"),
    ("IfcPort", "IfcProduct"),
    ("IfcPositioningElement", "IfcProduct"),
    ("IfcProjectionElement", "IfcFeatureElementAddition"),
    ("IfcProtectiveDevice", "IfcFlowController"),
    ("IfcProtectiveDeviceTrippingUnit", "IfcDistributionControlElement"),
    ("IfcProxy", "IfcProduct"),
    ("IfcPump", "IfcFlowMovingDevice"),
    ("IfcRail", "IfcBuiltElement"),
    ("IfcRailing", "IfcBuildingElement"),
    ("IfcRailway", "IfcFacility"),
    ("IfcRailwayPart", "IfcFacilityPart"),
    ("IfcRamp", "IfcBuildingElement"),
    ("IfcRampFlight", "IfcBuildingElement"),
    ("IfcReferent", "IfcPositioningElement"),
    ("IfcReinforcedSoil", "IfcEarthworksElement"),
    ("IfcReinforcingBar", "IfcReinforcingElement"),
    ("IfcReinforcingElement", "IfcElementComponent"),
    ("IfcReinforcingMesh", "IfcReinforcingElement"),
    ("IfcRoad", "IfcFacility"),
    ("IfcRoadPart", "IfcFacilityPart"),
    ("IfcRoof", "IfcBuildingElement"),
    ("IfcRoundedEdgeFeature", "IfcEdgeFeature"),
    ("IfcSanitaryTerminal", "IfcFlowTerminal"),
    ("IfcSensor", "IfcDistributionControlElement"),
    ("IfcShadingDevice", "IfcBuildingElement"),
    ("IfcSign", "IfcElementComponent"),
    ("IfcSignal", "IfcFlowTerminal"),
    ("IfcSite", "IfcSpatialStructureElement"),
    ("IfcSlab", "IfcBuildingElement"),
    ("IfcSlabElementedCase", "IfcSlab"),
    ("IfcSlabStandardCase", "IfcSlab"),
    ("IfcSolarDevice", "IfcEnergyConversionDevice"),
    ("IfcSolidStratum", "IfcGeotechnicalStratum"),
    ("IfcSpace", "IfcSpatialStructureElement"),
    ("IfcSpaceHeater", "IfcFlowTerminal"),
    ("IfcSpatialElement", "IfcProduct"),
    ("IfcSpatialStructureElement", "IfcSpatialElement"),
    ("IfcSpatialZone", "IfcSpatialElement"),
    ("IfcStackTerminal", "IfcFlowTerminal"),
    ("IfcStair", "IfcBuildingElement"),
    ("IfcStairFlight", "IfcBuildingElement"),
    ("IfcStructuralAction", "IfcStructuralActivity"),
    ("IfcStructuralActivity", "IfcProduct"),
    ("IfcStructuralConnection", "IfcStructuralItem"),
    ("IfcStructuralCurveAction", "IfcStructuralAction"),
    ("IfcStructuralCurveConnection", "IfcStructuralConnection"),
    ("IfcStructuralCurveMember", "IfcStructuralMember"),
    ("IfcStructuralCurveMemberVarying", "IfcStructuralCurveMember"),
    ("IfcStructuralCurveReaction", "IfcStructuralReaction"),
    ("IfcStructuralItem", "IfcProduct"),
    ("IfcStructuralLinearAction", "IfcStructuralCurveAction"),
    ("IfcStructuralLinearActionVarying", "IfcStructuralLinearAction"),
    ("IfcStructuralMember", "IfcStructuralItem"),
    ("IfcStructuralPlanarAction", "IfcStructuralSurfaceAction"),
    ("IfcStructuralPlanarActionVarying", "IfcStructuralPlanarAction"),
    ("IfcStructuralPointAction", "IfcStructuralAction"),
    ("IfcStructuralPointConnection", "IfcStructuralConnection"),
    ("IfcStructuralPointReaction", "IfcStructuralReaction"),
    ("IfcStructuralReaction", "IfcStructuralActivity"),
    ("IfcStructuralSurfaceAction", "IfcStructuralAction"),
    ("IfcStructuralSurfaceConnection", "IfcStructuralConnection"),
    ("IfcStructuralSurfaceMember", "IfcStructuralMember"),
    ("IfcStructuralSurfaceMemberVarying", "IfcStructuralSurfaceMember"),
    ("IfcStructuralSurfaceReaction", "IfcStructuralReaction"),
    ("IfcSurfaceFeature", "IfcFeatureElement"),
    ("IfcSwitchingDevice", "IfcFlowController"),
    ("IfcSystemFurnitureElement", "IfcFurnishingElement"),
    ("IfcTank", "IfcFlowStorageDevice"),
    ("IfcTendon", "IfcReinforcingElement"),
    ("IfcTendonAnchor", "IfcReinforcingElement"),
    ("IfcTendonConduit", "IfcReinforcingElement"),
    ("IfcTrackElement", "IfcBuiltElement"),
    ("IfcTransformer", "IfcEnergyConversionDevice"),
    ("IfcTransportationDevice", "IfcTransportElement"),
    ("IfcTransportElement", "IfcElement"),
    ("IfcTubeBundle", "IfcEnergyConversionDevice"),
    ("IfcUnitaryControlElement", "IfcDistributionControlElement"),
    ("IfcUnitaryEquipment", "IfcEnergyConversionDevice"),
    ("IfcValve", "IfcFlowController"),
    ("IfcVehicle", "IfcTransportationDevice"),
    ("IfcVibrationDamper", "IfcElementComponent"),
    ("IfcVibrationIsolator", "IfcElementComponent"),
    ("IfcVirtualElement", "IfcElement"),
    ("IfcVoidingFeature", "IfcFeatureElementSubtraction"),
    ("IfcVoidStratum", "IfcGeotechnicalStratum"),
    ("IfcWall", "IfcBuildingElement"),
    ("IfcWallElementedCase", "IfcWall"),
    ("IfcWallStandardCase", "IfcWall"),
    ("IfcWasteTerminal", "IfcFlowTerminal"),
    ("IfcWaterStratum", "IfcGeotechnicalStratum"),
    ("IfcWindow", "IfcBuildingElement"),
    ("IfcWindowStandardCase", "IfcWindow"),
];

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_uppercase())
        .cmp(b.bytes().map(|c| c.to_ascii_uppercase()))
}

fn lookup(name: &str) -> Option<(&'static str, &'static str)> {
    PRODUCT_HIERARCHY
        .binary_search_by(|(entry, _)| cmp_ignore_case(entry, name))
        .ok()
        .map(|i| PRODUCT_HIERARCHY[i])
}

/// Direct supertype of a product entity, `None` for anything outside the
/// `IfcProduct` subtree (and for `IfcProduct` itself)
pub(crate) fn product_supertype(name: &str) -> Option<&'static str> {
    lookup(name).map(|(_, parent)| parent)
}

/// Canonical spelling of a product entity name given in any case
pub(crate) fn canonical_product_name(name: &str) -> Option<&'static str> {
    lookup(name).map(|(canonical, _)| canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_unique() {
        for pair in PRODUCT_HIERARCHY.windows(2) {
            assert_eq!(
                cmp_ignore_case(pair[0].0, pair[1].0),
                Ordering::Less,
                "{} / {}",
                pair[0].0,
                pair[1].0
            );
        }
    }

    #[test]
    fn test_every_chain_ends_at_product() {
        for (name, _) in PRODUCT_HIERARCHY {
            let mut current = *name;
            let mut depth = 0;
            while let Some(parent) = product_supertype(current) {
                current = parent;
                depth += 1;
                assert!(depth < 16, "cycle through {}", name);
            }
            assert_eq!(current, "IfcProduct", "{} is not rooted", name);
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(product_supertype("IFCPIPESEGMENT"), Some("IfcFlowSegment"));
        assert_eq!(canonical_product_name("ifcspatialzone"), Some("IfcSpatialZone"));
        assert_eq!(product_supertype("IfcProduct"), None);
        assert_eq!(product_supertype("IfcPropertySet"), None);
    }
}
