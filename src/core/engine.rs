use crate::config::RunSettings;
use crate::core::patcher::DocumentPatcher;
use crate::domain::model::{
    EndpointSet, PublishOutcome, RunPlan, RunReport, ServiceOutcome, ServiceTarget,
};
use crate::domain::ports::{Publisher, Storage};
use crate::utils::error::{DrError, Result};
use serde_yaml::Value;
use std::path::PathBuf;

/// Runs every planned service through read, patch and write, then publishes once.
pub struct DrEngine<S: Storage, P: Publisher> {
    storage: S,
    publisher: P,
    settings: RunSettings,
}

impl<S: Storage, P: Publisher> DrEngine<S, P> {
    pub fn new(storage: S, publisher: P, settings: RunSettings) -> Self {
        Self {
            storage,
            publisher,
            settings,
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn process_service(
        &self,
        target: &ServiceTarget,
        endpoints: &EndpointSet,
    ) -> Result<ServiceOutcome> {
        let source = &target.file.source;
        let source_name = source.display().to_string();

        let content = self.storage.read_to_string(source)?;
        let mut document: Value =
            serde_yaml::from_str(&content).map_err(|e| DrError::YamlParse {
                path: source_name.clone(),
                source: e,
            })?;

        let report = DocumentPatcher::new(endpoints)
            .patch(&mut document, target.rds_endpoint.as_deref())?;
        for rewrite in &report.applied {
            tracing::debug!("Rewrote {}", rewrite.field());
        }

        let output = target.file.output_path();
        let rendered = serde_yaml::to_string(&document).map_err(|e| DrError::YamlSerialize {
            path: output.display().to_string(),
            source: e,
        })?;

        if self.settings.dry_run {
            tracing::info!("🔍 [dry-run] Would write {}", output.display());
            tracing::debug!("{}", rendered);
        } else {
            self.storage.write_string(&output, &rendered)?;
            tracing::info!(
                "📁 {} -> {} ({} rewrites)",
                target.file.file_name,
                output.display(),
                report.applied.len()
            );
        }

        Ok(ServiceOutcome {
            service: target.service.clone(),
            output,
            report,
        })
    }

    pub fn run(&mut self, plan: &RunPlan) -> Result<RunReport> {
        tracing::info!("🚀 Generating DR profiles for {} services", plan.targets.len());

        let mut services = Vec::with_capacity(plan.targets.len());
        for target in &plan.targets {
            let _span = tracing::info_span!("service", service = %target.service).entered();
            services.push(self.process_service(target, &plan.endpoints)?);
        }

        let outputs: Vec<PathBuf> = services.iter().map(|s| s.output.clone()).collect();
        let publish = self.publish(&outputs)?;

        Ok(RunReport { services, publish })
    }

    fn publish(&mut self, outputs: &[PathBuf]) -> Result<PublishOutcome> {
        if self.settings.dry_run {
            tracing::info!("🔍 [dry-run] Skipping commit and push");
            return Ok(PublishOutcome::DryRun);
        }
        if !self.settings.publish {
            tracing::info!("Publishing disabled, DR files left uncommitted");
            return Ok(PublishOutcome::Disabled);
        }

        self.publisher.stage(outputs)?;
        if !self.publisher.has_staged_changes()? {
            tracing::info!("DR profiles already up to date, nothing to commit");
            return Ok(PublishOutcome::NothingToCommit);
        }

        self.publisher.commit(&self.settings.commit_message)?;
        tracing::info!("Committed: {}", self.settings.commit_message);
        self.publisher.push(&self.settings.remote)?;
        tracing::info!("⬆️ Pushed to {}", self.settings.remote);

        Ok(PublishOutcome::Pushed)
    }
}
