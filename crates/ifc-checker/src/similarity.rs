// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-set similarity between two models

use crate::catalog::build_catalog;
use crate::diagnostics::Diagnostics;
use crate::resolver::resolve;
use ifc_checker_model::IfcModel;
use serde::{Deserialize, Serialize};

/// Outcome of probing model B with the property catalog of model A
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityReport {
    /// Catalog entries that resolved in A
    pub requests_made: usize,
    /// Of those, entries that resolved in B with a value of the same kind
    pub requests_matched: usize,
    /// `requests_matched / requests_made * 100`, or 0 when nothing was asked
    pub similarity_score: f64,
}

impl SimilarityReport {
    fn record(&mut self, matched: bool) {
        self.requests_made += 1;
        if matched {
            self.requests_matched += 1;
        }
    }

    fn finish(mut self) -> Self {
        self.similarity_score = if self.requests_made > 0 {
            self.requests_matched as f64 / self.requests_made as f64 * 100.0
        } else {
            0.0
        };
        self
    }
}

/// Compare the property values of `b` against the catalog of `a`
pub fn compare_properties(a: &dyn IfcModel, b: &dyn IfcModel) -> SimilarityReport {
    compare_properties_with(a, b, Diagnostics::default())
}

/// [`compare_properties`] with explicit diagnostic output
///
/// Entries that cannot be resolved in A are skipped; entries that cannot be
/// resolved in B count as requests without a match.
pub fn compare_properties_with(
    a: &dyn IfcModel,
    b: &dyn IfcModel,
    diagnostics: Diagnostics,
) -> SimilarityReport {
    let catalog = build_catalog(a);
    diagnostics.progress(format!("probing {} catalog entries", catalog.len()));

    let mut report = SimilarityReport::default();
    for entry in &catalog {
        let expected = match resolve(a, &entry.entity_type, &entry.pset, &entry.property) {
            Ok(value) => value,
            Err(e) => {
                diagnostics.swallowed("skipping catalog entry", e);
                continue;
            }
        };

        let matched = match resolve(b, &entry.entity_type, &entry.pset, &entry.property) {
            Ok(actual) => expected.kind().accepts(&actual.kind()),
            Err(e) => {
                diagnostics.swallowed("no counterpart in second model", e);
                false
            }
        };
        report.record(matched);
    }

    let report = report.finish();
    diagnostics.progress(format!(
        "{} of {} property requests matched",
        report.requests_matched, report.requests_made
    ));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_checker_parser::StepModel;

    const MODEL_A: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCWALL('w1',$,$,$,$,$,$,$,$);
#10=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);
#11=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(0.2),$);
#12=IFCPROPERTYSINGLEVALUE('Reference',$,IFCIDENTIFIER('W1'),$);
#13=IFCPROPERTYSET('a',$,'Pset_WallCommon',$,(#10,#11,#12));
#20=IFCRELDEFINESBYPROPERTIES('r1',$,$,$,(#1),#13);
ENDSEC;
END-ISO-10303-21;
"#;

    // Width has changed kind, Reference is gone
    const MODEL_B: &str = r#"ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCWALL('w1',$,$,$,$,$,$,$,$);
#10=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.F.),$);
#11=IFCPROPERTYSINGLEVALUE('Width',$,IFCLABEL('200mm'),$);
#13=IFCPROPERTYSET('a',$,'Pset_WallCommon',$,(#10,#11));
#20=IFCRELDEFINESBYPROPERTIES('r1',$,$,$,(#1),#13);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_self_similarity_is_full() {
        let model = StepModel::parse(MODEL_A).unwrap();
        let report = compare_properties(&model, &model);
        assert_eq!(report.requests_made, 3);
        assert_eq!(report.requests_matched, 3);
        assert_eq!(report.similarity_score, 100.0);
    }

    #[test]
    fn test_kind_mismatch_and_missing_property() {
        let a = StepModel::parse(MODEL_A).unwrap();
        let b = StepModel::parse(MODEL_B).unwrap();
        let report = compare_properties(&a, &b);
        assert_eq!(report.requests_made, 3);
        // Only IsExternal keeps its kind; the value itself differs
        assert_eq!(report.requests_matched, 1);
        assert!((report.similarity_score - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_catalog_comes_from_first_model_only() {
        let a = StepModel::parse(MODEL_B).unwrap();
        let b = StepModel::parse(MODEL_A).unwrap();
        let report = compare_properties(&a, &b);
        assert_eq!(report.requests_made, 2);
        assert_eq!(report.requests_matched, 1);
    }

    #[test]
    fn test_empty_first_model() {
        let empty = StepModel::empty("IFC4");
        let b = StepModel::parse(MODEL_A).unwrap();
        assert_eq!(compare_properties(&empty, &b), SimilarityReport::default());
    }

    #[test]
    fn test_empty_second_model_matches_nothing() {
        let a = StepModel::parse(MODEL_A).unwrap();
        let empty = StepModel::empty("IFC4");
        let report = compare_properties_with(&a, &empty, Diagnostics::new(true));
        assert_eq!(report.requests_made, 3);
        assert_eq!(report.requests_matched, 0);
        assert_eq!(report.similarity_score, 0.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = SimilarityReport {
            requests_made: 4,
            requests_matched: 3,
            similarity_score: 75.0,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"requests_made":4,"requests_matched":3,"similarity_score":75.0}"#
        );
    }
}
