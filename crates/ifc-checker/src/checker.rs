// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path-based entry points
//!
//! A [`Checker`] holds configuration only. Every call opens its own model
//! handle(s) and drops them before returning.

use crate::catalog;
use crate::cleaner::{clean_model, CleanOutcome, FALLBACK_SCHEMA};
use crate::config::CheckerConfig;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::resolver::{resolve, PropertyValue};
use crate::similarity::{compare_properties_with, SimilarityReport};
use crate::structure::compare_models;
use ifc_checker_model::IfcModel;
use ifc_checker_parser::StepModel;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckerConfig,
}

impl Checker {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    fn diagnostics(&self) -> Diagnostics {
        Diagnostics::new(self.config.diagnostics)
    }

    fn open(&self, path: &Path) -> Result<StepModel> {
        self.diagnostics().progress(format!("opening {}", path.display()));
        Ok(ifc_checker_parser::load(path)?)
    }

    /// Apply the failure mode: strict passes errors on, tolerant logs them
    /// and substitutes an empty value
    fn tolerate<T: Default>(&self, context: &str, result: Result<T>) -> Result<T> {
        match result {
            Err(e) if !self.config.is_strict() => {
                self.diagnostics().swallowed(context, e);
                Ok(T::default())
            }
            other => other,
        }
    }

    /// Every entity type name in the file
    pub fn element_types(&self, path: impl AsRef<Path>) -> Result<BTreeSet<String>> {
        let result = self
            .open(path.as_ref())
            .map(|model| catalog::element_types(&model));
        self.tolerate("listing element types", result)
    }

    /// Property set names attached to instances of `type_name`
    pub fn psets_for_type(
        &self,
        path: impl AsRef<Path>,
        type_name: &str,
    ) -> Result<BTreeSet<String>> {
        let result = self
            .open(path.as_ref())
            .map(|model| catalog::psets_for_type(&model, type_name));
        self.tolerate("listing property sets", result)
    }

    /// Property names of the first property set named `pset_name`
    pub fn properties_in_pset(&self, path: impl AsRef<Path>, pset_name: &str) -> Result<Vec<String>> {
        let result = self
            .open(path.as_ref())
            .map(|model| catalog::properties_in_pset(&model, pset_name));
        self.tolerate("listing properties", result)
    }

    /// Resolve a single property value
    ///
    /// Failures are always returned, whatever the failure mode.
    pub fn property_value(
        &self,
        path: impl AsRef<Path>,
        type_name: &str,
        pset_name: &str,
        property_name: &str,
    ) -> Result<PropertyValue> {
        let model = self.open(path.as_ref())?;
        resolve(&model, type_name, pset_name, property_name)
    }

    /// Structural similarity of two files
    ///
    /// A file that cannot be opened is an error in both failure modes; an
    /// empty fallback would produce a misleading score.
    pub fn compare_files(&self, a: impl AsRef<Path>, b: impl AsRef<Path>) -> Result<f64> {
        let model_a = self.open(a.as_ref())?;
        let model_b = self.open(b.as_ref())?;
        Ok(compare_models(&model_a, &model_b))
    }

    /// Property-set similarity of `b` against the catalog of `a`
    ///
    /// In tolerant mode an unreadable `a` yields an empty report and an
    /// unreadable `b` is treated as an empty model.
    pub fn compare_properties(
        &self,
        a: impl AsRef<Path>,
        b: impl AsRef<Path>,
    ) -> Result<SimilarityReport> {
        let model_a = match self.open(a.as_ref()) {
            Ok(model) => model,
            Err(e) => return self.tolerate("reading first model", Err(e)),
        };
        let model_b = match self.open(b.as_ref()) {
            Ok(model) => model,
            Err(e) if !self.config.is_strict() => {
                self.diagnostics().swallowed("reading second model", e);
                StepModel::empty(&model_a.metadata().schema_version)
            }
            Err(e) => return Err(e),
        };
        Ok(compare_properties_with(&model_a, &model_b, self.diagnostics()))
    }

    /// Reduce a file to one instance per whitelisted type
    ///
    /// In tolerant mode an unreadable file becomes [`CleanOutcome::Failed`].
    pub fn clean(&self, path: impl AsRef<Path>) -> Result<CleanOutcome> {
        match self.open(path.as_ref()) {
            Ok(model) => clean_model(&model, &self.config),
            Err(error) if !self.config.is_strict() => {
                self.diagnostics().swallowed("cleaning failed", &error);
                Ok(CleanOutcome::Failed {
                    model: StepModel::empty(FALLBACK_SCHEMA),
                    error,
                })
            }
            Err(error) => Err(error),
        }
    }
}
