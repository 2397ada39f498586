use anyhow::Result;
use serde_yaml::Value;
use spring_dr_config::domain::model::{PublishOutcome, Rewrite, ServiceId};
use spring_dr_config::domain::ports::Publisher;
use spring_dr_config::{DrEngine, DrError, EnvironmentResolver, LocalStorage, RunSettings};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Records publisher calls instead of touching git.
#[derive(Default)]
struct RecordingPublisher {
    calls: Vec<String>,
    nothing_staged: bool,
    fail_push: bool,
}

impl Publisher for RecordingPublisher {
    fn stage(&mut self, outputs: &[PathBuf]) -> spring_dr_config::Result<()> {
        self.calls.push(format!("stage {}", outputs.len()));
        Ok(())
    }

    fn has_staged_changes(&mut self) -> spring_dr_config::Result<bool> {
        Ok(!self.nothing_staged)
    }

    fn commit(&mut self, message: &str) -> spring_dr_config::Result<()> {
        self.calls.push(format!("commit {}", message));
        Ok(())
    }

    fn push(&mut self, remote: &str) -> spring_dr_config::Result<()> {
        if self.fail_push {
            return Err(DrError::Git {
                command: "push".to_string(),
                detail: "remote rejected".to_string(),
            });
        }
        self.calls.push(format!("push {}", remote));
        Ok(())
    }
}

const SCM_YAML: &str = r#"spring:
  application:
    name: scm-service
  datasource:
    url: jdbc:postgresql://scm-db.local:5432/scm
    username: scm
  redis:
    host: localhost
    port: 6379
kafka:
  server:
    address: localhost:9092
"#;

const HMT_YAML: &str = r#"server:
  port: 8080
elasticsearch:
  hosts: http://localhost:9200
"#;

fn write_service(root: &Path, dir: &str, file: &str, content: &str) -> Result<String> {
    let dir = root.join(dir);
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(file);
    std::fs::write(&path, content)?;
    Ok(path.to_string_lossy().into_owned())
}

fn env_for(root: &Path) -> Result<HashMap<String, String>> {
    let mut env = HashMap::from([
        ("REDIS_CLUSTER_ENDPOINT".to_string(), "redis.dr.internal".to_string()),
        ("KAFKA_CLUSTER_ENDPOINT".to_string(), "kafka.dr.internal:9092".to_string()),
        (
            "REDSHIFT_CLUSTER_ENDPOINT".to_string(),
            "jdbc:redshift://dw.dr.internal:5439/dw".to_string(),
        ),
        ("ES_CLUSTER_ENDPOINT".to_string(), "https://es.dr.internal".to_string()),
        ("SCM_RDS_ENDPOINT".to_string(), "scm.rds.dr.internal".to_string()),
    ]);
    env.insert(
        "SCM_FILE_PATH".to_string(),
        write_service(root, "scm", "scm-service-prod.yaml", SCM_YAML)?,
    );
    env.insert(
        "HMT_FILE_PATH".to_string(),
        write_service(root, "hmt", "hmt-service-prod.yaml", HMT_YAML)?,
    );
    Ok(env)
}

fn settings_for(root: &Path) -> RunSettings {
    RunSettings {
        working_dir: root.to_path_buf(),
        services: vec![ServiceId::new("SCM"), ServiceId::new("HMT")],
        ..RunSettings::default()
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    Ok(serde_yaml::from_str(&std::fs::read_to_string(path)?)?)
}

#[test]
fn test_generates_dr_profiles_and_publishes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let env = env_for(root)?;
    let settings = settings_for(root);

    let plan = EnvironmentResolver::new(&env).plan(&settings.services, &settings.working_dir)?;
    let mut engine = DrEngine::new(LocalStorage::new(), RecordingPublisher::default(), settings);
    let report = engine.run(&plan)?;

    assert_eq!(report.publish, PublishOutcome::Pushed);
    assert_eq!(report.services.len(), 2);

    let scm_out = root.join("scm/scm-service-dr.yaml");
    assert_eq!(report.services[0].output, scm_out);
    let scm = read_yaml(&scm_out)?;
    assert_eq!(
        scm["spring"]["datasource"]["url"].as_str(),
        Some("jdbc:postgresql://${DB_HOST:scm.rds.dr.internal}:5432/scm")
    );
    assert_eq!(
        scm["spring"]["redis"]["host"].as_str(),
        Some("${REDIS_HOST:redis.dr.internal}")
    );
    assert_eq!(
        scm["kafka"]["server"]["address"].as_str(),
        Some("${KAFKA_SERVER:kafka.dr.internal:9092}")
    );
    assert!(scm.get("redshift").is_none());
    assert!(scm.get("elasticsearch").is_none());

    let hmt = read_yaml(&root.join("hmt/hmt-service-dr.yaml"))?;
    assert_eq!(hmt["elasticsearch"]["hosts"].as_str(), Some("https://es.dr.internal"));
    assert_eq!(hmt["server"]["port"].as_u64(), Some(8080));
    assert!(hmt.get("spring").is_none());
    assert_eq!(report.services[1].report.applied, vec![Rewrite::SearchHosts]);

    // 原始檔案不可被覆寫
    assert_eq!(
        std::fs::read_to_string(root.join("scm/scm-service-prod.yaml"))?,
        SCM_YAML
    );

    assert_eq!(
        engine.publisher().calls,
        vec![
            "stage 2".to_string(),
            format!("commit {}", spring_dr_config::config::DEFAULT_COMMIT_MESSAGE),
            "push origin".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn test_missing_file_path_stops_before_any_service() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let mut env = env_for(root)?;
    env.remove("HMT_FILE_PATH");
    let settings = settings_for(root);

    let err = EnvironmentResolver::new(&env)
        .plan(&settings.services, &settings.working_dir)
        .unwrap_err();

    assert!(matches!(err, DrError::MissingEnv { ref name } if name == "HMT_FILE_PATH"));
    assert!(!root.join("scm/scm-service-dr.yaml").exists());
    Ok(())
}

#[test]
fn test_malformed_document_aborts_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let mut env = env_for(root)?;
    env.insert(
        "SCM_FILE_PATH".to_string(),
        write_service(root, "scm", "scm-service-prod.yaml", "spring: [unclosed\n")?,
    );
    let settings = settings_for(root);

    let plan = EnvironmentResolver::new(&env).plan(&settings.services, &settings.working_dir)?;
    let mut engine = DrEngine::new(LocalStorage::new(), RecordingPublisher::default(), settings);
    let err = engine.run(&plan).unwrap_err();

    assert!(matches!(err, DrError::YamlParse { .. }));
    assert!(!root.join("hmt/hmt-service-dr.yaml").exists());
    assert!(engine.publisher().calls.is_empty());
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let env = env_for(root)?;
    let settings = RunSettings {
        dry_run: true,
        ..settings_for(root)
    };

    let plan = EnvironmentResolver::new(&env).plan(&settings.services, &settings.working_dir)?;
    let mut engine = DrEngine::new(LocalStorage::new(), RecordingPublisher::default(), settings);
    let report = engine.run(&plan)?;

    assert_eq!(report.publish, PublishOutcome::DryRun);
    assert!(report.services[0].report.was_applied(Rewrite::DatabaseUrl));
    assert!(!root.join("scm/scm-service-dr.yaml").exists());
    assert!(engine.publisher().calls.is_empty());
    Ok(())
}

#[test]
fn test_nothing_staged_skips_commit() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let env = env_for(root)?;
    let settings = settings_for(root);
    let publisher = RecordingPublisher {
        nothing_staged: true,
        ..RecordingPublisher::default()
    };

    let plan = EnvironmentResolver::new(&env).plan(&settings.services, &settings.working_dir)?;
    let mut engine = DrEngine::new(LocalStorage::new(), publisher, settings);
    let report = engine.run(&plan)?;

    assert_eq!(report.publish, PublishOutcome::NothingToCommit);
    assert_eq!(engine.publisher().calls, vec!["stage 2".to_string()]);
    Ok(())
}

#[test]
fn test_failed_push_keeps_local_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let env = env_for(root)?;
    let settings = settings_for(root);
    let publisher = RecordingPublisher {
        fail_push: true,
        ..RecordingPublisher::default()
    };

    let plan = EnvironmentResolver::new(&env).plan(&settings.services, &settings.working_dir)?;
    let mut engine = DrEngine::new(LocalStorage::new(), publisher, settings);
    let err = engine.run(&plan).unwrap_err();

    assert!(matches!(err, DrError::Git { .. }));
    assert_ne!(err.severity().exit_code(), 0);
    assert!(root.join("scm/scm-service-dr.yaml").exists());
    assert!(root.join("hmt/hmt-service-dr.yaml").exists());
    Ok(())
}

#[test]
fn test_rerun_on_patched_output_is_stable() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    let mut env = env_for(root)?;
    let settings = RunSettings {
        publish: false,
        services: vec![ServiceId::new("SCM")],
        ..settings_for(root)
    };

    let plan = EnvironmentResolver::new(&env).plan(&settings.services, &settings.working_dir)?;
    let mut engine = DrEngine::new(LocalStorage::new(), RecordingPublisher::default(), settings.clone());
    engine.run(&plan)?;
    let first = std::fs::read_to_string(root.join("scm/scm-service-dr.yaml"))?;

    // 以產生的 DR 檔作為輸入再跑一次，輸出不應改變
    std::fs::copy(
        root.join("scm/scm-service-dr.yaml"),
        root.join("scm/scm-service-prod.yaml"),
    )?;
    env.insert(
        "SCM_FILE_PATH".to_string(),
        root.join("scm/scm-service-prod.yaml").to_string_lossy().into_owned(),
    );
    let plan = EnvironmentResolver::new(&env).plan(&settings.services, &settings.working_dir)?;
    let report = engine.run(&plan)?;
    let second = std::fs::read_to_string(root.join("scm/scm-service-dr.yaml"))?;

    assert_eq!(report.publish, PublishOutcome::Disabled);
    assert_eq!(first, second);
    Ok(())
}
